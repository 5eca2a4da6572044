//! Curio test utilities.
//!
//! Helpers for integration testing: raw item fixtures, repositories that
//! record or fail queries, and assertion utilities for rendered feeds.

use anyhow::Result;
use curio::{CollectionQuery, ContentRepository, QueryResponse, RawItem, ResponseMeta};
use parking_lot::Mutex;
use serde_json::{Map, Value as JsonValue, json};

/// Create a test item with a title and a slug derived from it.
pub fn test_item(title: &str) -> TestItem {
    TestItem {
        fields: Map::new(),
    }
    .with_field("title", json!(title))
    .with_field("slug", json!(slugify(title)))
    .with_field("status", json!("published"))
}

fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// A raw item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub fields: Map<String, JsonValue>,
}

impl TestItem {
    /// Set any field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Remove a field.
    pub fn without(mut self, name: &str) -> Self {
        self.fields.remove(name);
        self
    }

    pub fn with_slug(self, slug: &str) -> Self {
        self.with_field("slug", json!(slug))
    }

    pub fn with_url(self, url: &str) -> Self {
        self.with_field("url", json!(url))
    }

    pub fn with_excerpt(self, excerpt: &str) -> Self {
        self.with_field("excerpt", json!(excerpt))
    }

    pub fn with_date(self, date: &str) -> Self {
        self.with_field("date", json!(date))
    }

    pub fn with_modified(self, date: &str) -> Self {
        self.with_field("date_modified", json!(date))
    }

    pub fn with_author(self, author: &str) -> Self {
        self.with_field("author", json!(author))
    }

    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.with_field("tags", json!(tags))
    }

    /// Set as draft.
    pub fn draft(self) -> Self {
        self.with_field("status", json!("draft"))
    }

    /// Set as featured.
    pub fn featured(self) -> Self {
        self.with_field("featured", json!(true))
    }

    /// Finish into a raw repository item.
    pub fn build(self) -> RawItem {
        JsonValue::Object(self.fields)
    }
}

/// Repository that answers every query with a fixed response and records
/// the queries it received.
#[derive(Debug, Default)]
pub struct RecordingRepository {
    response: QueryResponse,
    queries: Mutex<Vec<CollectionQuery>>,
}

impl RecordingRepository {
    pub fn new(response: QueryResponse) -> Self {
        Self {
            response,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Respond with `items` and no metadata.
    pub fn with_items(items: Vec<RawItem>) -> Self {
        Self::new(QueryResponse::new(items))
    }

    /// Respond with `items` plus an explicit count.
    pub fn with_count(items: Vec<RawItem>, count: u64) -> Self {
        Self::new(QueryResponse::new(items).with_count(count))
    }

    /// Respond with `items` plus paging metadata.
    pub fn with_meta(items: Vec<RawItem>, meta: ResponseMeta) -> Self {
        Self::new(QueryResponse::new(items).with_meta(meta))
    }

    /// All queries received so far.
    pub fn queries(&self) -> Vec<CollectionQuery> {
        self.queries.lock().clone()
    }

    /// Most recent query, if any.
    pub fn last_query(&self) -> Option<CollectionQuery> {
        self.queries.lock().last().cloned()
    }
}

impl ContentRepository for RecordingRepository {
    fn query(&self, query: &CollectionQuery) -> Result<QueryResponse> {
        self.queries.lock().push(query.clone());
        Ok(self.response.clone())
    }
}

/// Error returned by [`FailingRepository`].
#[derive(Debug, thiserror::Error)]
#[error("repository unavailable: {0}")]
pub struct RepositoryUnavailable(pub String);

/// Repository whose every query fails.
#[derive(Debug)]
pub struct FailingRepository {
    reason: String,
}

impl FailingRepository {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl ContentRepository for FailingRepository {
    fn query(&self, _query: &CollectionQuery) -> Result<QueryResponse> {
        Err(RepositoryUnavailable(self.reason.clone()).into())
    }
}

/// Assertion helpers for rendered output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert the number of non-overlapping occurrences of `needle`.
    pub fn occurrences(haystack: &str, needle: &str, expected: usize) {
        let actual = haystack.matches(needle).count();
        assert_eq!(
            actual, expected,
            "Expected {expected} occurrences of '{needle}', found {actual}\nActual: {haystack}"
        );
    }
}
