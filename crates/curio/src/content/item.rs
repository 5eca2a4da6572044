//! Item shapes.

use serde::{Deserialize, Serialize};

/// A raw content item as stored by a repository.
pub type RawItem = serde_json::Value;

/// Template-ready view of a content item.
///
/// Every field is optional; absent fields render as empty XML elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedItem {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub url: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub date_modified: Option<String>,
}

impl TransformedItem {
    /// Url if present and non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}
