#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Fixtures use the real `MemoryRepository` and `DefaultTransformer` so
//! tests exercise actual query and transform behavior.

#![allow(dead_code)]

use curio::{MemoryRepository, RawItem};
use curio_test_utils::test_item;

/// A small blog collection, in insertion order:
///
/// | title  | date       | status    | tags        | author | featured |
/// |--------|------------|-----------|-------------|--------|----------|
/// | Alpha  | 2024-01-10 | published | rust        | ana    | yes      |
/// | Beta   | 2024-02-10 | published | rust, cms   | bo     |          |
/// | Gamma  | 2024-03-10 | draft     | cms         | ana    |          |
/// | Delta  | 2024-04-10 | published | go          | bo     | yes      |
/// | Omega  | 2024-05-10 | published |             | ana    |          |
pub fn blog_posts() -> Vec<RawItem> {
    vec![
        test_item("Alpha")
            .with_date("2024-01-10")
            .with_tags(&["rust"])
            .with_author("ana")
            .featured()
            .build(),
        test_item("Beta")
            .with_date("2024-02-10")
            .with_tags(&["rust", "cms"])
            .with_author("bo")
            .with_modified("2024-06-01T09:00:00Z")
            .build(),
        test_item("Gamma")
            .with_date("2024-03-10")
            .with_tags(&["cms"])
            .with_author("ana")
            .draft()
            .build(),
        test_item("Delta")
            .with_date("2024-04-10")
            .with_tags(&["go"])
            .with_author("bo")
            .with_url("https://elsewhere.example/delta")
            .featured()
            .build(),
        test_item("Omega")
            .with_date("2024-05-10")
            .with_author("ana")
            .with_excerpt("The last one")
            .build(),
    ]
}

/// Repository holding [`blog_posts`] as the `posts` collection.
pub fn blog_repository() -> MemoryRepository {
    MemoryRepository::new().with_collection("posts", blog_posts())
}

/// Titles of transformed items, in order.
pub fn titles(items: &[curio::TransformedItem]) -> Vec<String> {
    items.iter().filter_map(|i| i.title.clone()).collect()
}
