//! Content records shared by the content store, the generator and the CLI output.
//!
//! Every record mirrors one shape in the JSON content documents. Keys are
//! `camelCase` on disk and unknown keys are rejected, so a typo in
//! `projects.json` fails the build instead of silently dropping a field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The site owner. Exactly one per site, loaded from `profile.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteProfile {
    pub name: String,
    /// Job title shown under the name in the hero
    pub title: String,
    /// One-sentence summary used for meta descriptions and the about lead
    #[serde(default)]
    pub summary: String,
    /// Biography paragraphs, in display order
    #[serde(default)]
    pub bio: Vec<String>,
    pub contact: ContactChannels,
    #[serde(default)]
    pub socials: Vec<SocialLink>,
    /// Short rotating lines for the hero; the first one is typed out
    #[serde(default)]
    pub hero_taglines: Vec<String>,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Work history, most recent first
    #[serde(default)]
    pub experience: Vec<Experience>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactChannels {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// A `{value, label}` pair: "12+ / Years shipping", "40% / Faster builds".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Experience {
    pub company: String,
    pub role: String,
    /// Free-form, e.g. "2021 – present"
    pub period: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// A portfolio project. `slug` identifies it across the collection and in URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub cover_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub role: String,
    pub timeline: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Stat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// A blog post. The body is markdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub cover_image: String,
    pub date: NaiveDate,
    /// Minutes. Estimated from the body when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Post {
    /// Read time in minutes, falling back to an estimate from the body.
    pub fn read_minutes(&self) -> u32 {
        self.read_time
            .unwrap_or_else(|| crate::naming::estimate_read_minutes(&self.body))
    }
}
