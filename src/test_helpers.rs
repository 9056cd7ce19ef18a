//! Shared test utilities for the folio test suite.
//!
//! Provides fixture setup, record builders with sensible defaults, and
//! lookups that panic with the available choices on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let store = fixture_store();
//! let atlas = find_project(&store, "atlas");
//! assert!(atlas.featured);
//!
//! let store = ContentStore::from_parts(
//!     profile(),
//!     vec![project("a", &["Rust"]), project("b", &[])],
//!     vec![post("hello", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())],
//! ).unwrap();
//! assert_eq!(project_slugs(&store), vec!["a", "b"]);
//! ```

use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

use crate::content::ContentStore;
use crate::types::{ContactChannels, Experience, Post, Project, SiteProfile, Stat};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture content into a store.
pub fn fixture_store() -> ContentStore {
    let tmp = setup_fixtures();
    ContentStore::load(tmp.path()).unwrap()
}

// =========================================================================
// Record builders
// =========================================================================

pub fn profile() -> SiteProfile {
    SiteProfile {
        name: "Jane Doe".to_string(),
        title: "Systems Engineer".to_string(),
        summary: "I build fast, dependable software.".to_string(),
        bio: vec!["A decade of backend work.".to_string()],
        contact: ContactChannels {
            email: "jane@example.com".to_string(),
            location: None,
            phone: None,
        },
        socials: vec![],
        hero_taglines: vec!["I make slow things fast.".to_string()],
        badges: vec!["Rust".to_string()],
        stats: vec![Stat {
            value: "10+".to_string(),
            label: "Years shipping".to_string(),
        }],
        experience: vec![Experience {
            company: "Northwind".to_string(),
            role: "Staff Engineer".to_string(),
            period: "2021 – present".to_string(),
            summary: String::new(),
            highlights: vec![],
        }],
    }
}

/// A minimal, non-featured project with no narrative or links.
pub fn project(slug: &str, tags: &[&str]) -> Project {
    Project {
        slug: slug.to_string(),
        title: format!("Project {slug}"),
        short_description: "Short.".to_string(),
        long_description: "Long.".to_string(),
        challenge: None,
        solution: None,
        outcome: None,
        cover_image: format!("/images/{slug}.jpg"),
        images: vec![],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        technologies: vec![],
        role: "Engineer".to_string(),
        timeline: "1 month".to_string(),
        metrics: vec![],
        demo_url: None,
        repo_url: None,
        featured: false,
    }
}

pub fn post(slug: &str, date: NaiveDate) -> Post {
    Post {
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        excerpt: "Excerpt.".to_string(),
        body: "Body text.".to_string(),
        cover_image: format!("/images/{slug}.jpg"),
        date,
        read_time: None,
        tags: vec![],
        featured: false,
    }
}

// =========================================================================
// Store lookups: panic with a clear message on miss
// =========================================================================

/// Find a project by slug. Panics if not found.
pub fn find_project<'a>(store: &'a ContentStore, slug: &str) -> &'a Project {
    store.project_by_slug(slug).unwrap_or_else(|| {
        let slugs = project_slugs(store);
        panic!("project '{slug}' not found. Available: {slugs:?}")
    })
}

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(store: &'a ContentStore, slug: &str) -> &'a Post {
    store.post_by_slug(slug).unwrap_or_else(|| {
        let slugs = post_slugs(store);
        panic!("post '{slug}' not found. Available: {slugs:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All project slugs in document order.
pub fn project_slugs(store: &ContentStore) -> Vec<&str> {
    store.all_projects().iter().map(|p| p.slug.as_str()).collect()
}

/// All post slugs, newest first.
pub fn post_slugs(store: &ContentStore) -> Vec<&str> {
    store
        .posts_by_date_desc()
        .iter()
        .map(|p| p.slug.as_str())
        .collect()
}
