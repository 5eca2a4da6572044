//! RSS 2.0 feed generation.
//!
//! The channel is assembled with the `rss` crate's builders and serialized
//! in one pass. Item links and guids are absolutized against the channel
//! link before they go in.

use chrono::{DateTime, Utc};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use serde::{Deserialize, Serialize};

use super::common::absolutize_url;
use crate::content::TransformedItem;
use crate::date::resolve_date;

/// Channel-level RSS options. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssOptions {
    /// Channel title. Defaults to the collection name.
    pub title: Option<String>,

    /// Channel description.
    pub description: Option<String>,

    /// Channel link, also the base for relative item urls.
    pub link: Option<String>,
}

impl RssOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// An RSS channel ready to serialize.
pub struct RssFeed<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub link: &'a str,
    pub items: &'a [TransformedItem],
}

impl RssFeed<'_> {
    /// Build the channel. `now` stands in for missing or bad item dates.
    fn to_channel(&self, now: DateTime<Utc>) -> Channel {
        let items: Vec<Item> = self
            .items
            .iter()
            .map(|item| self.to_item(item, now))
            .collect();

        ChannelBuilder::default()
            .title(self.title)
            .link(self.link)
            .description(self.description)
            .last_build_date(now.to_rfc2822())
            .items(items)
            .build()
    }

    /// Serialize the channel as an RSS 2.0 document.
    pub fn to_xml(&self, now: DateTime<Utc>) -> String {
        self.to_channel(now).to_string()
    }

    fn to_item(&self, item: &TransformedItem, now: DateTime<Utc>) -> Item {
        let url = absolutize_url(item.url().unwrap_or_default(), self.link).into_owned();
        let pub_date = resolve_date(&[item.date.as_deref()], now);

        ItemBuilder::default()
            .title(item.title.clone().unwrap_or_default())
            .link(url.clone())
            .description(item.excerpt.clone().unwrap_or_default())
            .pub_date(pub_date.to_rfc2822())
            .guid(GuidBuilder::default().permalink(true).value(url).build())
            .build()
    }
}
