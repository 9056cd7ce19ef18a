//! Content store: typed, validated access to the site's JSON documents.
//!
//! ## Content Directory
//!
//! ```text
//! content/
//! ├── config.toml        # Site configuration (optional)
//! ├── profile.json       # SiteProfile: name, bio, contact, stats, experience
//! ├── projects.json      # [Project]
//! ├── posts.json         # [Post]
//! └── assets/            # Copied verbatim to the output root
//!     ├── resume.pdf
//!     └── images/...
//! ```
//!
//! ## Validation
//!
//! Documents are deserialized with unknown keys rejected, then checked for:
//! - Slugs that are not lowercase dash-separated URL segments
//! - Duplicate project or post slugs
//! - Duplicate tags within one project, tags with no URL-safe characters, and
//!   distinct tags anywhere in the collection that share a tag page URL
//! - Empty required text (profile name and email, titles)
//!
//! Any failure aborts the load; a store that exists is always consistent.
//!
//! Lookups never fail: an unknown slug is `None`.

use crate::naming::{is_valid_slug, slugify};
use crate::types::{Post, Project, SiteProfile};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROFILE_FILE: &str = "profile.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const POSTS_FILE: &str = "posts.json";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{kind} slug '{slug}' is not a lowercase dash-separated identifier")]
    InvalidSlug { kind: &'static str, slug: String },
    #[error("duplicate {kind} slug '{slug}'")]
    DuplicateSlug { kind: &'static str, slug: String },
    #[error("project '{slug}' lists tag '{tag}' more than once")]
    DuplicateTag { slug: String, tag: String },
    #[error("project '{slug}' has tag '{tag}' with no URL-safe characters")]
    UnroutableTag { slug: String, tag: String },
    #[error("tags '{first}' and '{second}' share the URL segment '{tag_slug}'")]
    TagSlugCollision {
        first: String,
        second: String,
        tag_slug: String,
    },
    #[error("{context}: '{field}' must not be empty")]
    MissingField {
        context: String,
        field: &'static str,
    },
}

/// Read-only view over the loaded content.
#[derive(Debug, Clone)]
pub struct ContentStore {
    profile: SiteProfile,
    projects: Vec<Project>,
    /// Sorted newest first at construction
    posts: Vec<Post>,
}

impl ContentStore {
    /// Load and validate the three documents under `root`.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        let profile: SiteProfile = read_json(&root.join(PROFILE_FILE))?;
        let projects: Vec<Project> = read_json(&root.join(PROJECTS_FILE))?;
        let posts: Vec<Post> = read_json(&root.join(POSTS_FILE))?;
        Self::from_parts(profile, projects, posts)
    }

    /// Validate already-deserialized content.
    pub fn from_parts(
        profile: SiteProfile,
        projects: Vec<Project>,
        mut posts: Vec<Post>,
    ) -> Result<Self, ContentError> {
        validate_profile(&profile)?;
        validate_projects(&projects)?;
        validate_posts(&posts)?;

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        Ok(Self {
            profile,
            projects,
            posts,
        })
    }

    pub fn site_profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Projects in document order.
    pub fn all_projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project_by_slug(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Featured projects first, each group in document order.
    pub fn projects_featured_first(&self) -> Vec<&Project> {
        let (mut featured, rest): (Vec<&Project>, Vec<&Project>) =
            self.projects.iter().partition(|p| p.featured);
        featured.extend(rest);
        featured
    }

    pub fn featured_projects(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.featured).collect()
    }

    /// Projects carrying `tag` (exact match), in document order.
    pub fn projects_with_tag(&self, tag: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.tags.iter().any(|t| t == tag))
            .collect()
    }

    /// Posts, newest first. Same-day posts are ordered by slug.
    pub fn posts_by_date_desc(&self) -> &[Post] {
        &self.posts
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Every project tag, deduplicated and sorted.
    pub fn all_tags(&self) -> Vec<String> {
        self.projects
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn require(value: &str, context: impl Fn() -> String, field: &'static str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::MissingField {
            context: context(),
            field,
        });
    }
    Ok(())
}

fn validate_profile(profile: &SiteProfile) -> Result<(), ContentError> {
    let ctx = || "profile".to_string();
    require(&profile.name, ctx, "name")?;
    require(&profile.contact.email, ctx, "contact.email")?;
    for job in &profile.experience {
        require(&job.company, || "profile experience".to_string(), "company")?;
    }
    Ok(())
}

fn validate_slugs<'a>(
    kind: &'static str,
    slugs: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for slug in slugs {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug {
                kind,
                slug: slug.to_string(),
            });
        }
        if !seen.insert(slug) {
            return Err(ContentError::DuplicateSlug {
                kind,
                slug: slug.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_projects(projects: &[Project]) -> Result<(), ContentError> {
    validate_slugs("project", projects.iter().map(|p| p.slug.as_str()))?;
    // Tag pages live at one URL per slugified tag, across the whole collection
    let mut tag_slugs: HashMap<String, &str> = HashMap::new();
    for project in projects {
        let ctx = || format!("project '{}'", project.slug);
        require(&project.title, ctx, "title")?;
        require(&project.short_description, ctx, "shortDescription")?;

        let mut tags = HashSet::new();
        for tag in &project.tags {
            if !tags.insert(tag.as_str()) {
                return Err(ContentError::DuplicateTag {
                    slug: project.slug.clone(),
                    tag: tag.clone(),
                });
            }
            let tag_slug = slugify(tag);
            if tag_slug.is_empty() {
                return Err(ContentError::UnroutableTag {
                    slug: project.slug.clone(),
                    tag: tag.clone(),
                });
            }
            match tag_slugs.get(&tag_slug) {
                Some(first) if *first != tag.as_str() => {
                    return Err(ContentError::TagSlugCollision {
                        first: first.to_string(),
                        second: tag.clone(),
                        tag_slug,
                    });
                }
                Some(_) => {}
                None => {
                    tag_slugs.insert(tag_slug, tag.as_str());
                }
            }
        }
    }
    Ok(())
}

fn validate_posts(posts: &[Post]) -> Result<(), ContentError> {
    validate_slugs("post", posts.iter().map(|p| p.slug.as_str()))?;
    for post in posts {
        require(&post.title, || format!("post '{}'", post.slug), "title")?;
    }
    Ok(())
}
