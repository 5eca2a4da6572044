//! Sitemap generation.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/posts/hello/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.5</priority>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{absolutize_url, push_element};
use crate::content::TransformedItem;
use crate::date::resolve_date;
use crate::error::CurioError;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change (`<changefreq>`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = CurioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            _ => Err(CurioError::InvalidChangeFrequency(s.to_string())),
        }
    }
}

/// Sitemap options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapOptions {
    /// Base for `<loc>` values built from slugs and for relative urls.
    pub base_url: Option<String>,

    /// Emitted as `<changefreq>` for every entry.
    #[serde(default)]
    pub changefreq: ChangeFrequency,

    /// Emitted as `<priority>`; clamped to `0.0..=1.0`.
    #[serde(default = "default_priority")]
    pub priority: f32,
}

fn default_priority() -> f32 {
    0.5
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            changefreq: ChangeFrequency::default(),
            priority: default_priority(),
        }
    }
}

impl SitemapOptions {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.changefreq = changefreq;
        self
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }
}

/// A `urlset` ready to serialize.
pub struct SitemapFeed<'a> {
    pub base_url: &'a str,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
    pub items: &'a [TransformedItem],
}

impl SitemapFeed<'_> {
    /// Serialize the urlset. `now` stands in for missing or bad item dates.
    pub fn to_xml(&self, now: DateTime<Utc>) -> String {
        let priority = self.clamped_priority();
        let priority = format!("{priority:.1}");
        let base = self.base_url.trim().trim_end_matches('/');

        let mut xml = String::with_capacity(128 + self.items.len() * 192);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for item in self.items {
            let loc = location(item, base);
            let lastmod = resolve_date(&[item.date_modified.as_deref(), item.date.as_deref()], now);

            xml.push_str("  <url>\n");
            push_element(&mut xml, "    ", "loc", &loc);
            push_element(&mut xml, "    ", "lastmod", &lastmod.format("%Y-%m-%d").to_string());
            push_element(&mut xml, "    ", "changefreq", self.changefreq.as_str());
            push_element(&mut xml, "    ", "priority", &priority);
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn clamped_priority(&self) -> f32 {
        if (0.0..=1.0).contains(&self.priority) {
            return self.priority;
        }
        let clamped = if self.priority.is_nan() {
            default_priority()
        } else {
            self.priority.clamp(0.0, 1.0)
        };
        tracing::warn!(
            requested = self.priority,
            clamped = clamped,
            "sitemap priority outside 0.0..=1.0, clamping"
        );
        clamped
    }
}

/// Absolutized item url, or `base/slug` when the item has none.
fn location<'i>(item: &'i TransformedItem, base: &str) -> Cow<'i, str> {
    if let Some(url) = item.url() {
        return absolutize_url(url, base);
    }
    let slug = item.slug.as_deref().unwrap_or_default();
    if base.is_empty() {
        Cow::Borrowed(slug)
    } else {
        Cow::Owned(format!("{base}/{}", slug.trim_start_matches('/')))
    }
}
