//! Slug conventions shared by content validation and page generation.
//!
//! Projects and posts carry an explicit `slug` that becomes their URL:
//! `/projects/<slug>/`, `/blog/<slug>/`. Tags are free text in the content
//! documents and are slugified for their listing pages:
//!
//! - `"Rust"` → `rust`
//! - `"Machine Learning"` → `machine-learning`
//! - `"C++ / Systems"` → `c-systems`

use regex::Regex;
use std::sync::LazyLock;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern is valid"));

/// Average reading speed used when a post has no explicit `readTime`.
const WORDS_PER_MINUTE: usize = 200;

/// Whether `slug` is a lowercase, dash-separated URL segment.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Turn free text into a URL segment.
///
/// Alphanumerics are lowercased and kept, every other run of characters
/// collapses into one dash, and leading/trailing dashes are dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Estimate reading time in whole minutes, never less than one.
pub fn estimate_read_minutes(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}
