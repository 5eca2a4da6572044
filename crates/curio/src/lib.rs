//! Curio — collection query builder.
//!
//! Lets a template layer filter, sort, and paginate a named content
//! collection, and render it as RSS 2.0 or a sitemaps.org 0.9 `urlset`.
//! Storage and item normalization are delegated to [`ContentRepository`]
//! and [`ItemTransformer`] implementations.

pub mod config;
pub mod content;
pub mod date;
pub mod error;
pub mod feed;
pub mod query;

pub use config::Config;
pub use content::{
    ContentRepository, DefaultTransformer, ItemTransformer, MemoryRepository, RawItem,
    TransformOptions, TransformedItem,
};
pub use error::{CurioError, CurioResult};
pub use feed::{ChangeFrequency, RssOptions, SitemapOptions};
pub use query::{
    CollectionQuery, CollectionQueryBuilder, FilterValue, Filters, PageMeta, PageResult,
    QueryOptions, QueryResponse, ResponseMeta, SortDirection,
};
