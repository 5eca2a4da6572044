//! Fluent collection query builder.
//!
//! Setters consume the builder and return it, so every call yields a new
//! value and a configured builder can be cloned and reused. Executing
//! operations borrow the builder and never change it: per-call overrides
//! (the RSS and sitemap page sizes, `first`'s limit) live only in the
//! [`CollectionQuery`] built for that call.

use anyhow::Result;
use chrono::Utc;

use super::types::{
    CollectionQuery, DATE_FIELD, DEFAULT_PER_PAGE, FilterValue, Filters, PageMeta, PageResult,
    QueryOptions, QueryResponse, RSS_PER_PAGE, SITEMAP_PER_PAGE, SortDirection, filter_key,
};
use crate::content::{
    ContentRepository, ItemTransformer, RawItem, TransformOptions, TransformedItem,
};
use crate::feed::{RssFeed, RssOptions, SitemapFeed, SitemapOptions};

/// Query builder for a single named collection.
#[derive(Clone)]
pub struct CollectionQueryBuilder<'a> {
    collection: String,
    repository: &'a dyn ContentRepository,
    transformer: &'a dyn ItemTransformer,
    options: QueryOptions,
    transform: TransformOptions,
}

impl<'a> CollectionQueryBuilder<'a> {
    /// Create a builder for `collection` with default options.
    pub fn new(
        collection: impl Into<String>,
        repository: &'a dyn ContentRepository,
        transformer: &'a dyn ItemTransformer,
    ) -> Self {
        Self {
            collection: collection.into(),
            repository,
            transformer,
            options: QueryOptions::default(),
            transform: TransformOptions::default(),
        }
    }

    /// Collection this builder queries.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Options accumulated so far.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Options forwarded to the transformer.
    pub fn transform_options(&self) -> &TransformOptions {
        &self.transform
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    /// Set a single filter. Replaces any previous value for `key`.
    pub fn filter_by(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.options.filters.insert(key.into(), value.into());
        self
    }

    /// Merge a filter map. Keys in `filters` win; other keys are kept.
    pub fn filter(mut self, filters: Filters) -> Self {
        self.options.filters.extend(filters);
        self
    }

    pub fn status(self, status: impl Into<String>) -> Self {
        self.filter_by(filter_key::STATUS, FilterValue::String(status.into()))
    }

    pub fn featured(self, featured: bool) -> Self {
        self.filter_by(filter_key::FEATURED, featured)
    }

    /// Require all of `tags`.
    pub fn tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.filter_by(filter_key::TAGS, tags)
    }

    /// Require a single tag. Replaces any previous tag filter.
    pub fn tag(self, tag: impl Into<String>) -> Self {
        let tag: String = tag.into();
        self.tags([tag])
    }

    pub fn author(self, author: impl Into<String>) -> Self {
        self.filter_by(filter_key::AUTHOR, FilterValue::String(author.into()))
    }

    /// Only items dated strictly before `date`.
    pub fn before(self, date: impl Into<String>) -> Self {
        self.filter_by(filter_key::DATE_BEFORE, FilterValue::String(date.into()))
    }

    /// Only items dated strictly after `date`.
    pub fn after(self, date: impl Into<String>) -> Self {
        self.filter_by(filter_key::DATE_AFTER, FilterValue::String(date.into()))
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.options.sort_field = field.into();
        self.options.sort_direction = direction;
        self
    }

    /// Newest first.
    pub fn latest(self) -> Self {
        self.order_by(DATE_FIELD, SortDirection::Desc)
    }

    /// Oldest first.
    pub fn oldest(self) -> Self {
        self.order_by(DATE_FIELD, SortDirection::Asc)
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Page for `get` (1-indexed; 0 is treated as 1).
    pub fn page(mut self, page: u32) -> Self {
        self.options.page = Some(page.max(1));
        self
    }

    /// Items per page (0 is treated as 1).
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.options.per_page = Some(per_page.max(1));
        self
    }

    /// Alias of [`per_page`](Self::per_page).
    pub fn limit(self, limit: u32) -> Self {
        self.per_page(limit)
    }

    /// Items to skip. Negative values clamp to 0.
    pub fn offset(mut self, offset: i64) -> Self {
        self.options.offset = u64::try_from(offset).unwrap_or(0);
        self
    }

    // -------------------------------------------------------------------------
    // Transformer options
    // -------------------------------------------------------------------------

    pub fn page_path(mut self, page_path: impl Into<String>) -> Self {
        self.transform.page_path = Some(page_path.into());
        self
    }

    pub fn pretty_urls(mut self, pretty_urls: bool) -> Self {
        self.transform.pretty_urls = pretty_urls;
        self
    }

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------

    /// Fetch up to `per_page` items after `offset`, ignoring `page`.
    pub fn all(&self) -> Result<Vec<TransformedItem>> {
        let query = self.query(None, Some(self.per_page_or(DEFAULT_PER_PAGE)), false);
        let response = self.execute(&query)?;
        self.transform_items(&response.items)
    }

    /// Fetch one page with paging metadata.
    pub fn get(&self) -> Result<PageResult> {
        let page = self.options.page.unwrap_or(1);
        let per_page = self.per_page_or(DEFAULT_PER_PAGE);
        let query = self.query(Some(page), Some(per_page), false);
        let response = self.execute(&query)?;

        let meta = match response.meta {
            Some(meta) => PageMeta::from(meta),
            None => PageMeta::new(1, 1, response.total(), per_page, self.options.offset),
        };

        Ok(PageResult {
            items: self.transform_items(&response.items)?,
            meta,
        })
    }

    /// First matching item, if any.
    pub fn first(&self) -> Result<Option<TransformedItem>> {
        let query = self.query(None, Some(1), false);
        let response = self.execute(&query)?;
        match response.items.first() {
            Some(raw) => Ok(Some(self.transform_item(raw)?)),
            None => Ok(None),
        }
    }

    /// Number of matching items, ignoring paging.
    pub fn count(&self) -> Result<u64> {
        let mut query = self.query(None, None, false);
        query.offset = 0;
        Ok(self.execute(&query)?.total())
    }

    /// Render the newest items as an RSS 2.0 document.
    pub fn rss(&self, options: &RssOptions) -> Result<String> {
        let query = self.query(None, Some(self.per_page_or(RSS_PER_PAGE)), true);
        let items = self.transform_items(&self.execute(&query)?.items)?;

        let feed = RssFeed {
            title: options.title.as_deref().unwrap_or(&self.collection),
            description: options.description.as_deref().unwrap_or_default(),
            link: options.link.as_deref().unwrap_or_default(),
            items: &items,
        };
        Ok(feed.to_xml(Utc::now()))
    }

    /// Render the newest items as a sitemap `urlset`.
    pub fn sitemap(&self, options: &SitemapOptions) -> Result<String> {
        let query = self.query(None, Some(self.per_page_or(SITEMAP_PER_PAGE)), true);
        let items = self.transform_items(&self.execute(&query)?.items)?;

        let feed = SitemapFeed {
            base_url: options.base_url.as_deref().unwrap_or_default(),
            changefreq: options.changefreq,
            priority: options.priority,
            items: &items,
        };
        Ok(feed.to_xml(Utc::now()))
    }

    fn per_page_or(&self, default: u32) -> u32 {
        self.options.per_page.unwrap_or(default)
    }

    fn query(&self, page: Option<u32>, per_page: Option<u32>, latest: bool) -> CollectionQuery {
        let (sort_field, sort_direction) = if latest {
            (DATE_FIELD.to_string(), SortDirection::Desc)
        } else {
            (self.options.sort_field.clone(), self.options.sort_direction)
        };

        CollectionQuery {
            collection: self.collection.clone(),
            filters: self.options.filters.clone(),
            sort_field,
            sort_direction,
            page,
            per_page,
            offset: self.options.offset,
        }
    }

    fn execute(&self, query: &CollectionQuery) -> Result<QueryResponse> {
        tracing::debug!(
            collection = %query.collection,
            filters = query.filters.len(),
            sort = %query.sort_field,
            direction = %query.sort_direction,
            page = ?query.page,
            per_page = ?query.per_page,
            offset = query.offset,
            "querying collection"
        );

        let response = self.repository.query(query)?;

        tracing::debug!(
            collection = %query.collection,
            returned = response.items.len(),
            count = ?response.count,
            "collection query complete"
        );
        Ok(response)
    }

    fn transform_item(&self, raw: &RawItem) -> Result<TransformedItem> {
        self.transformer.transform(raw, &self.transform, &self.collection)
    }

    fn transform_items(&self, items: &[RawItem]) -> Result<Vec<TransformedItem>> {
        items.iter().map(|raw| self.transform_item(raw)).collect()
    }
}
