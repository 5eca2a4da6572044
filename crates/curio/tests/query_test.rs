#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Query builder integration tests.
//!
//! Filter merging, paging metadata, counting, and collaborator pass-through.

mod common;

use common::{blog_repository, titles};
use curio::{
    CollectionQueryBuilder, DefaultTransformer, FilterValue, Filters, ResponseMeta, SortDirection,
};
use curio_test_utils::{FailingRepository, RecordingRepository, RepositoryUnavailable, test_item};

// -------------------------------------------------------------------------
// Filter merging
// -------------------------------------------------------------------------

#[test]
fn later_setters_override_same_key() {
    let repo = RecordingRepository::default();
    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .status("draft")
        .featured(true)
        .tag("rust")
        .status("published")
        .tags(["cms", "go"]);

    let filters = &builder.options().filters;
    assert_eq!(filters.len(), 3);
    assert_eq!(filters["status"], FilterValue::from("published"));
    assert_eq!(filters["featured"], FilterValue::Boolean(true));
    assert_eq!(
        filters["tags"],
        FilterValue::from(vec!["cms".to_string(), "go".to_string()])
    );
}

#[test]
fn filter_map_merges_by_key() {
    let repo = RecordingRepository::default();
    let mut extra = Filters::new();
    extra.insert("author".to_string(), FilterValue::from("bo"));
    extra.insert("status".to_string(), FilterValue::from("archived"));

    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .status("published")
        .after("2024-01-01")
        .filter(extra)
        .filter_by("category", "news");

    let filters = &builder.options().filters;
    assert_eq!(filters["status"], FilterValue::from("archived"));
    assert_eq!(filters["author"], FilterValue::from("bo"));
    assert_eq!(filters["date_after"], FilterValue::from("2024-01-01"));
    assert_eq!(filters["category"], FilterValue::from("news"));
}

#[test]
fn builder_values_are_independent() {
    let repo = RecordingRepository::default();
    let base = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer).status("published");
    let drafts = base.clone().status("draft");

    assert_eq!(base.options().filters["status"], FilterValue::from("published"));
    assert_eq!(drafts.options().filters["status"], FilterValue::from("draft"));
}

#[test]
fn filters_reach_repository_unchanged() {
    let repo = RecordingRepository::default();
    CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .author("ana")
        .before("2024-12-31")
        .order_by("title", SortDirection::Asc)
        .offset(3)
        .per_page(7)
        .all()
        .unwrap();

    let query = repo.last_query().unwrap();
    assert_eq!(query.collection, "posts");
    assert_eq!(query.filters["author"], FilterValue::from("ana"));
    assert_eq!(query.filters["date_before"], FilterValue::from("2024-12-31"));
    assert_eq!(query.sort_field, "title");
    assert_eq!(query.sort_direction, SortDirection::Asc);
    assert_eq!(query.page, None);
    assert_eq!(query.per_page, Some(7));
    assert_eq!(query.offset, 3);
}

// -------------------------------------------------------------------------
// all / first
// -------------------------------------------------------------------------

#[test]
fn all_filters_and_sorts_memory_collection() {
    let repo = blog_repository();
    let items = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .status("published")
        .tag("rust")
        .all()
        .unwrap();

    assert_eq!(titles(&items), vec!["Beta", "Alpha"]);
}

#[test]
fn all_ignores_page_and_uses_default_per_page() {
    let repo = RecordingRepository::default();
    CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .page(4)
        .all()
        .unwrap();

    let query = repo.last_query().unwrap();
    assert_eq!(query.page, None);
    assert_eq!(query.per_page, Some(10));
}

#[test]
fn all_honors_offset() {
    let repo = blog_repository();
    let items = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .oldest()
        .offset(1)
        .limit(2)
        .all()
        .unwrap();

    assert_eq!(titles(&items), vec!["Beta", "Gamma"]);
}

#[test]
fn first_returns_head_or_none() {
    let repo = blog_repository();
    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer);

    let first = builder.clone().featured(true).first().unwrap().unwrap();
    assert_eq!(first.title.as_deref(), Some("Delta"));

    let none = builder.author("nobody").first().unwrap();
    assert!(none.is_none());
}

#[test]
fn first_requests_single_item() {
    let repo = RecordingRepository::with_items(vec![
        test_item("One").build(),
        test_item("Two").build(),
    ]);
    let first = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .per_page(50)
        .first()
        .unwrap()
        .unwrap();

    assert_eq!(first.title.as_deref(), Some("One"));
    assert_eq!(repo.last_query().unwrap().per_page, Some(1));
}

// -------------------------------------------------------------------------
// get
// -------------------------------------------------------------------------

#[test]
fn get_pages_through_collection() {
    let repo = blog_repository();
    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer).per_page(2);

    let page1 = builder.clone().get().unwrap();
    assert_eq!(titles(&page1.items), vec!["Omega", "Delta"]);
    assert_eq!(page1.meta.current_page, 1);
    assert_eq!(page1.meta.last_page, 3);
    assert_eq!(page1.meta.total_items, 5);
    assert!(!page1.meta.has_prev);
    assert!(page1.meta.has_next);

    let page2 = builder.clone().page(2).get().unwrap();
    assert_eq!(titles(&page2.items), vec!["Gamma", "Beta"]);
    assert!(page2.meta.has_prev);
    assert!(page2.meta.has_next);

    let page3 = builder.page(3).get().unwrap();
    assert_eq!(titles(&page3.items), vec!["Alpha"]);
    assert!(page3.meta.has_prev);
    assert!(!page3.meta.has_next);
}

#[test]
fn get_pager_flags_follow_page_numbers() {
    for (current, last) in [(1, 1), (1, 4), (2, 4), (4, 4), (7, 3)] {
        let repo = RecordingRepository::with_meta(
            vec![],
            ResponseMeta {
                current_page: current,
                last_page: last,
                total_items: 40,
                per_page: 10,
                offset: 0,
            },
        );
        let meta = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
            .get()
            .unwrap()
            .meta;

        assert_eq!(meta.has_prev, meta.current_page > 1);
        assert_eq!(meta.has_next, meta.current_page < meta.total_pages());
    }
}

#[test]
fn get_defaults_when_repository_omits_meta() {
    let repo = RecordingRepository::with_items(vec![
        test_item("One").build(),
        test_item("Two").build(),
    ]);
    let result = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .page(3)
        .offset(4)
        .get()
        .unwrap();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.meta.current_page, 1);
    assert_eq!(result.meta.last_page, 1);
    assert_eq!(result.meta.total_items, 2);
    assert_eq!(result.meta.per_page, 10);
    assert_eq!(result.meta.offset, 4);
    assert!(!result.meta.has_prev);
    assert!(!result.meta.has_next);

    let query = repo.last_query().unwrap();
    assert_eq!(query.page, Some(3));
    assert_eq!(query.offset, 4);
}

#[test]
fn get_result_serializes_for_templates() {
    let repo = blog_repository();
    let result = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .per_page(1)
        .get()
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["items"][0]["title"], "Omega");
    assert_eq!(json["items"][0]["url"], "/posts/omega/");
    assert_eq!(json["meta"]["has_next"], true);
    assert_eq!(json["meta"]["last_page"], 5);
}

// -------------------------------------------------------------------------
// count
// -------------------------------------------------------------------------

#[test]
fn count_prefers_explicit_count() {
    let items = (0..5).map(|i| test_item(&format!("Item {i}")).build()).collect();
    let repo = RecordingRepository::with_count(items, 42);

    let count = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .count()
        .unwrap();
    assert_eq!(count, 42);
}

#[test]
fn count_falls_back_to_item_length() {
    let items = (0..5).map(|i| test_item(&format!("Item {i}")).build()).collect();
    let repo = RecordingRepository::with_items(items);

    let count = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .count()
        .unwrap();
    assert_eq!(count, 5);
}

#[test]
fn count_is_unpaginated() {
    let repo = RecordingRepository::default();
    CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .page(2)
        .per_page(3)
        .offset(5)
        .status("published")
        .count()
        .unwrap();

    let query = repo.last_query().unwrap();
    assert_eq!(query.page, None);
    assert_eq!(query.per_page, None);
    assert_eq!(query.offset, 0);
    assert_eq!(query.filters["status"], FilterValue::from("published"));
}

#[test]
fn count_matches_memory_filters() {
    let repo = blog_repository();
    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer);

    assert_eq!(builder.clone().count().unwrap(), 5);
    assert_eq!(builder.clone().author("ana").count().unwrap(), 3);
    assert_eq!(builder.clone().status("draft").count().unwrap(), 1);
    assert_eq!(
        builder
            .after("2024-02-01")
            .before("2024-04-30")
            .count()
            .unwrap(),
        3
    );
}

// -------------------------------------------------------------------------
// Collaborator errors
// -------------------------------------------------------------------------

#[test]
fn repository_errors_pass_through() {
    let repo = FailingRepository::new("maintenance window");
    let builder = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer);

    for err in [
        builder.all().unwrap_err(),
        builder.get().unwrap_err(),
        builder.count().unwrap_err(),
        builder.first().unwrap_err(),
        builder.rss(&Default::default()).unwrap_err(),
        builder.sitemap(&Default::default()).unwrap_err(),
    ] {
        let source = err
            .downcast_ref::<RepositoryUnavailable>()
            .expect("original repository error");
        assert_eq!(source.0, "maintenance window");
    }
}

#[test]
fn transformer_errors_pass_through() {
    let repo = RecordingRepository::with_items(vec![serde_json::json!(["not", "an", "object"])]);
    let err = CollectionQueryBuilder::new("posts", &repo, &DefaultTransformer)
        .all()
        .unwrap_err();
    assert!(err.to_string().contains("not a JSON object"));
}
