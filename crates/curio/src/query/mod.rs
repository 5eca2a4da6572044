//! Collection query module.
//!
//! This module provides:
//! - CollectionQueryBuilder: fluent filter/sort/paging builder with feed output
//! - Types: QueryOptions, CollectionQuery, QueryResponse, PageResult, etc.

mod builder;
pub mod types;

pub use builder::CollectionQueryBuilder;
pub use types::{
    CollectionQuery, DATE_FIELD, DEFAULT_PER_PAGE, FilterValue, Filters, PageMeta, PageResult,
    QueryOptions, QueryResponse, RSS_PER_PAGE, ResponseMeta, SITEMAP_PER_PAGE, SortDirection,
    filter_key, page_count,
};
