//! Heading outline derived from the buffer, for navigation sidebars.

use regex::Regex;
use serde::Serialize;
use smol_str::SmolStr;
use std::sync::LazyLock;

use crate::format::is_fence;

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").expect("heading pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRecord {
    /// Anchor id, as produced by [`slugify`].
    pub id: SmolStr,
    pub text: SmolStr,
    /// 1..=6
    pub level: u8,
}

/// Scan `text` for ATX headings in document order.
pub fn extract_headers(text: &str) -> Vec<HeaderRecord> {
    let mut in_fence = false;
    let mut headers = Vec::new();
    for line in text.lines() {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        let Some(caps) = ATX_HEADING.captures(line) else {
            continue;
        };
        let heading = caps[2].trim();
        if heading.is_empty() {
            continue;
        }
        headers.push(HeaderRecord {
            id: slugify(heading),
            text: SmolStr::new(heading),
            level: caps[1].len() as u8,
        });
    }
    headers
}

/// Anchor id for a heading.
///
/// Lower-cases, drops everything but alphanumerics, whitespace, `-` and `_`,
/// then turns each whitespace run into a single `-`.
pub fn slugify(text: &str) -> SmolStr {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if !(c.is_alphanumeric() || c == '-' || c == '_') {
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.extend(c.to_lowercase());
    }
    SmolStr::new(slug)
}
