//! Feed rendering.
//!
//! Serializes transformed items as RSS 2.0 or sitemaps.org 0.9 XML. Relative
//! item urls are made absolute against the feed's base link.

mod common;
mod rss;
mod sitemap;

pub use common::{absolutize_url, escape_xml};
pub use rss::{RssFeed, RssOptions};
pub use sitemap::{ChangeFrequency, SitemapFeed, SitemapOptions};
