//! CLI output formatting for `check` and `build`.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every entity (project,
//! post, tag) leads with its positional index and title; slugs, dates and
//! output paths follow as secondary context. This reads as a content
//! inventory while still letting users trace each line back to a record.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Profile
//!     Jane Doe, Systems Engineer
//!     Contact: jane@example.com
//!
//! Projects
//! 001 Atlas (featured)
//!     Slug: atlas
//!     Tags: Rust, Maps
//! 002 Ledger CLI
//!     Slug: ledger-cli
//!     Tags: Rust, CLI
//!
//! Posts
//! 001 Caching at the edge without tears
//!     2024-09-12, 7 min read
//!
//! Tags
//!     CLI (1), Maps (1), Rust (2)
//!
//! Config
//!     config.toml
//!     assets/
//!     Sections: hero, about, experience, projects, blog, contact
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! Projects → projects/index.html
//!     001 Atlas → projects/atlas/index.html
//!     Rust → projects/tags/rust/index.html
//! Writing → blog/index.html
//!     001 Caching at the edge without tears → blog/edge-caching/index.html
//! Not found → 404.html
//!
//! Stylesheet: assets/site.3f9a1c0b2e.css
//! Generated 3 project pages, 4 tag pages, 3 post pages, copied 2 assets
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::content::ContentStore;
use crate::generate::{GenerateReport, PageKind};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format `check` output: an inventory of the loaded content and config.
pub fn format_check_output(
    store: &ContentStore,
    config: &SiteConfig,
    source_root: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();
    let profile = store.site_profile();

    lines.push("Profile".to_string());
    lines.push(format!("{}{}, {}", indent(1), profile.name, profile.title));
    if !profile.summary.is_empty() {
        lines.push(format!("{}{}", indent(1), truncate_desc(&profile.summary, 60)));
    }
    lines.push(format!("{}Contact: {}", indent(1), profile.contact.email));
    if !profile.experience.is_empty() {
        lines.push(format!(
            "{}Experience: {} roles",
            indent(1),
            profile.experience.len()
        ));
    }

    lines.push(String::new());
    lines.push("Projects".to_string());
    for (i, project) in store.all_projects().iter().enumerate() {
        let marker = if project.featured { " (featured)" } else { "" };
        lines.push(format!("{} {}{}", format_index(i + 1), project.title, marker));
        lines.push(format!("{}Slug: {}", indent(1), project.slug));
        if !project.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), project.tags.join(", ")));
        }
    }

    lines.push(String::new());
    lines.push("Posts".to_string());
    for (i, post) in store.posts_by_date_desc().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!(
            "{}{}, {} min read",
            indent(1),
            post.date.format("%Y-%m-%d"),
            post.read_minutes()
        ));
    }

    let tags = store.all_tags();
    if !tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        let counted: Vec<String> = tags
            .iter()
            .map(|t| format!("{} ({})", t, store.projects_with_tag(t).len()))
            .collect();
        lines.push(format!("{}{}", indent(1), counted.join(", ")));
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    if source_root.join(&config.site.assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), config.site.assets_dir));
    }
    let sections: Vec<&str> = config.layout.sections.iter().map(|s| s.as_str()).collect();
    lines.push(format!("{}Sections: {}", indent(1), sections.join(", ")));

    lines
}

/// Print check output to stdout.
pub fn print_check_output(store: &ContentStore, config: &SiteConfig, source_root: &Path) {
    for line in format_check_output(store, config, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format `build` output: every written page, grouped under its index.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let of_kind = |kind: PageKind| report.pages.iter().filter(move |p| p.kind == kind);

    for page in of_kind(PageKind::Home) {
        lines.push(format!("Home \u{2192} {}", page.path));
    }
    for page in of_kind(PageKind::ProjectIndex) {
        lines.push(format!("{} \u{2192} {}", page.title, page.path));
    }
    for (i, page) in of_kind(PageKind::Project).enumerate() {
        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(1),
            format_index(i + 1),
            page.title,
            page.path
        ));
    }
    for page in of_kind(PageKind::Tag) {
        lines.push(format!("{}{} \u{2192} {}", indent(1), page.title, page.path));
    }
    for page in of_kind(PageKind::BlogIndex) {
        lines.push(format!("{} \u{2192} {}", page.title, page.path));
    }
    for (i, page) in of_kind(PageKind::Post).enumerate() {
        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(1),
            format_index(i + 1),
            page.title,
            page.path
        ));
    }
    for page in of_kind(PageKind::NotFound) {
        lines.push(format!("{} \u{2192} {}", page.title, page.path));
    }

    lines.push(String::new());
    lines.push(format!("Stylesheet: {}", report.stylesheet));
    lines.push(format!(
        "Generated {} project pages, {} tag pages, {} post pages, copied {} assets",
        report.count(PageKind::Project),
        report.count(PageKind::Tag),
        report.count(PageKind::Post),
        report.assets_copied
    ));

    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
