//! Shared helpers for feed generation.

use std::borrow::Cow;

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

/// Make `value` absolute against `base`.
///
/// Values that are empty or already start with `http` (any case) are
/// returned unchanged, as is everything when `base` is empty. Otherwise
/// leading `./`, `../` and `/` are stripped and the rest is joined to
/// `base` with a single slash.
pub fn absolutize_url<'a>(value: &'a str, base: &str) -> Cow<'a, str> {
    let base = base.trim().trim_end_matches('/');
    if base.is_empty() || value.is_empty() || has_http_scheme(value) {
        return Cow::Borrowed(value);
    }

    let mut rest = value;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }

    Cow::Owned(format!("{base}/{rest}"))
}

fn has_http_scheme(value: &str) -> bool {
    value
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

/// Append `<tag>escaped text</tag>` on its own indented line.
pub(super) fn push_element(xml: &mut String, indent: &str, tag: &str, text: &str) {
    xml.push_str(indent);
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(text));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}
