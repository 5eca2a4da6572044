//! Collection query types.
//!
//! Provides type definitions for the fluent query builder:
//! - QueryOptions: filters, sort, and paging accumulated by the builder
//! - CollectionQuery / QueryResponse: the repository contract
//! - PageResult / PageMeta: typed paged results with pager flags

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::{RawItem, TransformedItem};
use crate::error::CurioError;

/// Items per page for `all`/`get`/`first` when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Items per page for RSS feeds when none is configured.
pub const RSS_PER_PAGE: u32 = 20;

/// Items per page for sitemaps when none is configured.
pub const SITEMAP_PER_PAGE: u32 = 1000;

/// Field used for date ordering.
pub const DATE_FIELD: &str = "date";

/// Well-known filter keys.
pub mod filter_key {
    pub const STATUS: &str = "status";
    pub const FEATURED: &str = "featured";
    pub const TAGS: &str = "tags";
    pub const AUTHOR: &str = "author";
    pub const DATE_BEFORE: &str = "date_before";
    pub const DATE_AFTER: &str = "date_after";
}

/// Filter map. Ordered so queries are logged and serialized deterministically.
pub type Filters = BTreeMap<String, FilterValue>;

/// Filter value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// String value.
    String(String),
    /// List of values (tags, or any-of matching).
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Borrow as a string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to boolean if possible.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FilterValue::Boolean(b) => Some(*b),
            FilterValue::Integer(i) => Some(*i != 0),
            FilterValue::String(s) => s.parse().ok(),
            FilterValue::List(_) => None,
        }
    }

    /// Convert to integer if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            FilterValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Extract a list of strings. A single string yields a one-element list.
    pub fn as_string_list(&self) -> Vec<String> {
        match self {
            FilterValue::String(s) => vec![s.clone()],
            FilterValue::List(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(value: Vec<String>) -> Self {
        FilterValue::List(value.into_iter().map(FilterValue::String).collect())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = CurioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(CurioError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Options accumulated by the builder's chained setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Filter conditions, merged by key.
    #[serde(default)]
    pub filters: Filters,

    /// Field to sort by.
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    /// Sort direction.
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Requested page (1-indexed). Only `get` uses it.
    pub page: Option<u32>,

    /// Items per page. Operations apply their own default when unset.
    pub per_page: Option<u32>,

    /// Number of items to skip before paging.
    #[serde(default)]
    pub offset: u64,
}

fn default_sort_field() -> String {
    DATE_FIELD.to_string()
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            filters: Filters::new(),
            sort_field: default_sort_field(),
            sort_direction: SortDirection::default(),
            page: None,
            per_page: None,
            offset: 0,
        }
    }
}

/// A single query as handed to a [`ContentRepository`](crate::ContentRepository).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionQuery {
    /// Collection name.
    pub collection: String,

    /// Filter conditions.
    pub filters: Filters,

    /// Field to sort by.
    pub sort_field: String,

    /// Sort direction.
    pub sort_direction: SortDirection,

    /// Page to fetch; `None` means "first `per_page` items after `offset`".
    pub page: Option<u32>,

    /// Page size; `None` means unlimited.
    pub per_page: Option<u32>,

    /// Items skipped before paging.
    pub offset: u64,
}

/// Raw repository answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Raw items in repository order.
    #[serde(default)]
    pub items: Vec<RawItem>,

    /// Paging metadata, when the repository computed it.
    #[serde(default)]
    pub meta: Option<ResponseMeta>,

    /// Explicit total count of matches, independent of paging.
    #[serde(default)]
    pub count: Option<u64>,
}

impl QueryResponse {
    /// Create a response carrying only items.
    pub fn new(items: Vec<RawItem>) -> Self {
        Self {
            items,
            meta: None,
            count: None,
        }
    }

    /// Attach paging metadata.
    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Attach an explicit count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Explicit count if present, otherwise the number of returned items.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.items.len() as u64)
    }
}

/// Paging metadata reported by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub total_items: u64,
    pub per_page: u32,
    pub offset: u64,
}

/// Paging metadata returned from `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (1-indexed).
    pub current_page: u32,

    /// Last page number; never below 1.
    pub last_page: u32,

    /// Total count (before paging).
    pub total_items: u64,

    /// Items per page.
    pub per_page: u32,

    /// Items skipped before paging.
    pub offset: u64,

    /// Whether there's a previous page.
    pub has_prev: bool,

    /// Whether there's a next page.
    pub has_next: bool,
}

impl PageMeta {
    /// Create metadata with pager flags derived from the page numbers.
    pub fn new(
        current_page: u32,
        last_page: u32,
        total_items: u64,
        per_page: u32,
        offset: u64,
    ) -> Self {
        let current_page = current_page.max(1);
        let last_page = last_page.max(1);

        Self {
            current_page,
            last_page,
            total_items,
            per_page,
            offset,
            has_prev: current_page > 1,
            has_next: current_page < last_page,
        }
    }

    /// Total number of pages. Alias of `last_page`.
    pub fn total_pages(&self) -> u32 {
        self.last_page
    }
}

impl From<ResponseMeta> for PageMeta {
    fn from(meta: ResponseMeta) -> Self {
        Self::new(
            meta.current_page,
            meta.last_page,
            meta.total_items,
            meta.per_page,
            meta.offset,
        )
    }
}

/// Result from `get`: transformed items plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<TransformedItem>,
    pub meta: PageMeta,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of pages needed for `total` items, never below 1.
pub fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(per_page));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
