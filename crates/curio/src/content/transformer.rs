//! Raw item → template item transformation.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::item::{RawItem, TransformedItem};

/// Maximum excerpt length (in characters) when derived from `content`.
const EXCERPT_LENGTH: usize = 200;

/// Options forwarded to the transformer on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Path prefix for generated item urls. Defaults to the collection name.
    pub page_path: Option<String>,

    /// Generate `/path/slug/` instead of `/path/slug.html`.
    pub pretty_urls: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            page_path: None,
            pretty_urls: true,
        }
    }
}

/// Converts raw repository items into [`TransformedItem`]s.
pub trait ItemTransformer: Send + Sync {
    fn transform(
        &self,
        raw: &RawItem,
        options: &TransformOptions,
        collection: &str,
    ) -> Result<TransformedItem>;
}

/// Reads the conventional field names from a JSON object item.
///
/// - `title`, `slug`, `date`, `url` map directly
/// - `date_modified` falls back to `updated`
/// - `excerpt` falls back to a plain-text cut of `content`
/// - a missing `url` is built from the page path and slug
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl ItemTransformer for DefaultTransformer {
    fn transform(
        &self,
        raw: &RawItem,
        options: &TransformOptions,
        collection: &str,
    ) -> Result<TransformedItem> {
        let Some(fields) = raw.as_object() else {
            bail!("item in collection '{collection}' is not a JSON object");
        };

        let slug = string_field(fields, "slug");
        let url = string_field(fields, "url").or_else(|| {
            slug.as_deref().map(|slug| {
                let page_path = options.page_path.as_deref().unwrap_or(collection);
                item_url(page_path, slug, options.pretty_urls)
            })
        });

        Ok(TransformedItem {
            title: string_field(fields, "title"),
            excerpt: string_field(fields, "excerpt")
                .or_else(|| string_field(fields, "content").map(|c| excerpt(&c, EXCERPT_LENGTH))),
            url,
            slug,
            date: string_field(fields, "date"),
            date_modified: string_field(fields, "date_modified")
                .or_else(|| string_field(fields, "updated")),
        })
    }
}

/// Non-empty string (or number) field.
fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn item_url(page_path: &str, slug: &str, pretty_urls: bool) -> String {
    let page_path = page_path.trim_matches('/');
    let slug = slug.trim_matches('/');
    let path = if page_path.is_empty() {
        format!("/{slug}")
    } else {
        format!("/{page_path}/{slug}")
    };

    if pretty_urls {
        format!("{path}/")
    } else {
        format!("{path}.html")
    }
}

/// Plain-text excerpt: tags dropped, whitespace collapsed, cut on a word boundary.
fn excerpt(content: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(content.len().min(max_chars * 2));
    let mut in_tag = false;
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '<' if !in_tag && chars.peek().is_some_and(|&n| opens_tag(n)) => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches([',', '.', ';', ':']))
}

/// A `<` starts markup only before a tag name, a closing slash, or `!`.
fn opens_tag(next: char) -> bool {
    next.is_ascii_alphabetic() || next == '/' || next == '!'
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transform(raw: Value, options: &TransformOptions) -> TransformedItem {
        DefaultTransformer.transform(&raw, options, "posts").unwrap()
    }

    #[test]
    fn maps_conventional_fields() {
        let item = transform(
            json!({
                "title": "Hello",
                "excerpt": "Short intro",
                "slug": "hello",
                "url": "/blog/hello/",
                "date": "2024-01-02",
                "date_modified": "2024-02-03"
            }),
            &TransformOptions::default(),
        );

        assert_eq!(item.title.as_deref(), Some("Hello"));
        assert_eq!(item.excerpt.as_deref(), Some("Short intro"));
        assert_eq!(item.url.as_deref(), Some("/blog/hello/"));
        assert_eq!(item.date_modified.as_deref(), Some("2024-02-03"));
    }

    #[test]
    fn builds_pretty_url_from_collection() {
        let item = transform(json!({"slug": "hello"}), &TransformOptions::default());
        assert_eq!(item.url.as_deref(), Some("/posts/hello/"));
    }

    #[test]
    fn builds_html_url_from_page_path() {
        let options = TransformOptions {
            page_path: Some("/journal/".to_string()),
            pretty_urls: false,
        };
        let item = transform(json!({"slug": "hello"}), &options);
        assert_eq!(item.url.as_deref(), Some("/journal/hello.html"));
    }

    #[test]
    fn empty_page_path_puts_items_at_root() {
        let options = TransformOptions {
            page_path: Some(String::new()),
            pretty_urls: true,
        };
        let item = transform(json!({"slug": "about"}), &options);
        assert_eq!(item.url.as_deref(), Some("/about/"));
    }

    #[test]
    fn no_slug_no_url() {
        let item = transform(json!({"title": "Orphan"}), &TransformOptions::default());
        assert!(item.url.is_none());
        assert!(item.slug.is_none());
    }

    #[test]
    fn modified_falls_back_to_updated() {
        let item = transform(
            json!({"updated": "2024-05-06"}),
            &TransformOptions::default(),
        );
        assert_eq!(item.date_modified.as_deref(), Some("2024-05-06"));
    }

    #[test]
    fn blank_strings_are_absent() {
        let item = transform(json!({"title": "  ", "url": ""}), &TransformOptions::default());
        assert!(item.title.is_none());
        assert!(item.url.is_none());
    }

    #[test]
    fn excerpt_from_content_strips_markup() {
        let item = transform(
            json!({"content": "<p>Hello <b>world</b></p>\n\n<p>again</p>"}),
            &TransformOptions::default(),
        );
        assert_eq!(item.excerpt.as_deref(), Some("Hello world again"));
    }

    #[test]
    fn excerpt_keeps_literal_less_than() {
        let item = transform(
            json!({"content": "<p>If 1 < 2 then we ship the release today.</p><!-- note -->"}),
            &TransformOptions::default(),
        );
        assert_eq!(item.excerpt.as_deref(), Some("If 1 < 2 then we ship the release today."));
    }

    #[test]
    fn excerpt_cuts_on_word_boundary() {
        let text = excerpt("alpha beta gamma delta", 13);
        assert_eq!(text, "alpha beta...");
    }

    #[test]
    fn rejects_non_object_items() {
        let err = DefaultTransformer
            .transform(&json!("just a string"), &TransformOptions::default(), "posts")
            .unwrap_err();
        assert!(err.to_string().contains("posts"));
    }
}
