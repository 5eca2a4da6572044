//! Collection storage.
//!
//! [`ContentRepository`] is the seam between the query builder and whatever
//! actually stores content. [`MemoryRepository`] keeps collections of JSON
//! items in memory and evaluates queries against them.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use serde_json::Value;

use crate::date::parse_date;
use crate::error::{CurioError, CurioResult};
use crate::query::{
    CollectionQuery, FilterValue, QueryResponse, ResponseMeta, SortDirection, filter_key,
    page_count,
};

use super::item::RawItem;

/// Executes collection queries.
///
/// Implementations receive the query by shared reference and must not retain
/// it. Errors are returned to the builder's caller untouched.
pub trait ContentRepository: Send + Sync {
    fn query(&self, query: &CollectionQuery) -> Result<QueryResponse>;
}

/// In-memory collections of raw JSON items.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    collections: HashMap<String, Vec<RawItem>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a collection.
    pub fn with_collection(mut self, name: impl Into<String>, items: Vec<RawItem>) -> Self {
        self.insert(name, items);
        self
    }

    /// Add (or replace) a collection in place.
    pub fn insert(&mut self, name: impl Into<String>, items: Vec<RawItem>) {
        self.collections.insert(name.into(), items);
    }

    /// Load collections from a JSON document.
    ///
    /// An array becomes the collection `default_collection`; an object maps
    /// collection names to arrays of items.
    pub fn from_json(value: Value, default_collection: &str) -> CurioResult<Self> {
        let mut repository = Self::new();
        match value {
            Value::Array(items) => repository.insert(default_collection, items),
            Value::Object(map) => {
                for (name, items) in map {
                    let Value::Array(items) = items else {
                        return Err(CurioError::InvalidCollectionData(format!(
                            "collection '{name}' is not an array"
                        )));
                    };
                    repository.insert(name, items);
                }
            }
            _ => {
                return Err(CurioError::InvalidCollectionData(
                    "expected an array of items or an object of collections".to_string(),
                ));
            }
        }
        Ok(repository)
    }

    /// Names of all stored collections.
    pub fn collection_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ContentRepository for MemoryRepository {
    fn query(&self, query: &CollectionQuery) -> Result<QueryResponse> {
        let Some(items) = self.collections.get(&query.collection) else {
            tracing::debug!(
                collection = %query.collection,
                "unknown collection, returning empty result"
            );
            return Ok(QueryResponse::default().with_count(0));
        };

        let mut matched: Vec<&RawItem> = items
            .iter()
            .filter(|item| {
                query
                    .filters
                    .iter()
                    .all(|(key, expected)| matches_filter(item, key, expected))
            })
            .collect();

        // Stable sort keeps insertion order for equal keys.
        matched.sort_by(|a, b| {
            compare_field(
                a.get(&query.sort_field),
                b.get(&query.sort_field),
                query.sort_direction,
            )
        });

        let total = matched.len() as u64;
        let page_start = match (query.page, query.per_page) {
            (Some(page), Some(per_page)) => {
                u64::from(page.saturating_sub(1)) * u64::from(per_page)
            }
            _ => 0,
        };
        let skip = usize::try_from(query.offset.saturating_add(page_start)).unwrap_or(usize::MAX);
        let take = query
            .per_page
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        let page_items: Vec<RawItem> = matched.into_iter().skip(skip).take(take).cloned().collect();

        let mut response = QueryResponse::new(page_items).with_count(total);
        if let (Some(page), Some(per_page)) = (query.page, query.per_page) {
            response = response.with_meta(ResponseMeta {
                current_page: page.max(1),
                last_page: page_count(total.saturating_sub(query.offset), per_page),
                total_items: total,
                per_page,
                offset: query.offset,
            });
        }
        Ok(response)
    }
}

fn matches_filter(item: &RawItem, key: &str, expected: &FilterValue) -> bool {
    match key {
        filter_key::TAGS => {
            let wanted = expected.as_string_list();
            let tags: Vec<&str> = item
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| tags.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            wanted.iter().all(|tag| tags.contains(&tag.as_str()))
        }
        filter_key::DATE_BEFORE | filter_key::DATE_AFTER => {
            let Some(bound) = expected.as_str().and_then(parse_date) else {
                tracing::warn!(
                    filter = %key,
                    value = ?expected,
                    "ignoring unparseable date filter"
                );
                return true;
            };
            let Some(date) = item.get("date").and_then(Value::as_str).and_then(parse_date) else {
                return false;
            };
            if key == filter_key::DATE_BEFORE {
                date < bound
            } else {
                date > bound
            }
        }
        _ => value_matches(item.get(key), expected),
    }
}

fn value_matches(actual: Option<&Value>, expected: &FilterValue) -> bool {
    if let FilterValue::List(options) = expected {
        return options.iter().any(|o| value_matches(actual, o));
    }

    match actual {
        // An absent flag reads as false.
        None | Some(Value::Null) => matches!(expected, FilterValue::Boolean(false)),
        Some(Value::Bool(a)) => expected.as_bool() == Some(*a),
        Some(Value::Number(n)) => match expected.as_str() {
            Some(s) => n.to_string() == s,
            None => n.as_i64().is_some_and(|n| expected.as_i64() == Some(n)),
        },
        Some(Value::String(a)) => match expected.as_str() {
            Some(b) => a == b,
            None => a.parse::<i64>().is_ok_and(|a| expected.as_i64() == Some(a)),
        },
        Some(Value::Array(values)) => expected
            .as_str()
            .is_some_and(|s| values.iter().any(|v| v.as_str() == Some(s))),
        Some(Value::Object(_)) => false,
    }
}

/// Order two field values. Missing values sort last in either direction.
fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => compare_values(a, b),
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::String(a), Value::String(b)) => match (parse_date(a), parse_date(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        _ => a.to_string().cmp(&b.to_string()),
    }
}
