//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::feed::{ChangeFrequency, RssOptions, SitemapOptions};

/// Feed and transformer defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Public site URL; base for feed links and sitemap locations.
    pub site_url: Option<String>,

    /// RSS channel title. The collection name is used when unset.
    pub feed_title: Option<String>,

    /// RSS channel description (default: empty).
    pub feed_description: String,

    /// Sitemap `<changefreq>` (default: weekly).
    pub sitemap_changefreq: ChangeFrequency,

    /// Sitemap `<priority>` (default: 0.5).
    pub sitemap_priority: f32,

    /// Generate `/path/slug/` item urls instead of `/path/slug.html` (default: true).
    pub pretty_urls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            feed_title: None,
            feed_description: String::new(),
            sitemap_changefreq: ChangeFrequency::default(),
            sitemap_priority: 0.5,
            pretty_urls: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let site_url = non_empty("SITE_URL").map(|v| v.trim().trim_end_matches('/').to_string());

        let feed_title = non_empty("FEED_TITLE");

        let feed_description = lookup("FEED_DESCRIPTION").unwrap_or_default();

        let sitemap_changefreq = non_empty("SITEMAP_CHANGEFREQ")
            .map(|v| v.parse::<ChangeFrequency>())
            .transpose()
            .context("SITEMAP_CHANGEFREQ must be a sitemap change frequency")?
            .unwrap_or_default();

        let sitemap_priority = non_empty("SITEMAP_PRIORITY")
            .unwrap_or_else(|| "0.5".to_string())
            .trim()
            .parse::<f32>()
            .context("SITEMAP_PRIORITY must be a number between 0.0 and 1.0")?;

        let pretty_urls = non_empty("PRETTY_URLS")
            .unwrap_or_else(|| "true".to_string())
            .trim()
            .to_lowercase()
            .parse::<bool>()
            .context("PRETTY_URLS must be 'true' or 'false'")?;

        Ok(Self {
            site_url,
            feed_title,
            feed_description,
            sitemap_changefreq,
            sitemap_priority,
            pretty_urls,
        })
    }

    /// RSS options seeded from this configuration.
    pub fn rss_options(&self) -> RssOptions {
        RssOptions {
            title: self.feed_title.clone(),
            description: Some(self.feed_description.clone()),
            link: self.site_url.clone(),
        }
    }

    /// Sitemap options seeded from this configuration.
    pub fn sitemap_options(&self) -> SitemapOptions {
        SitemapOptions {
            base_url: self.site_url.clone(),
            changefreq: self.sitemap_changefreq,
            priority: self.sitemap_priority,
        }
    }
}
