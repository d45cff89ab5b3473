//! Core data models used throughout Folio.
//!
//! These types represent the project records, search results, and static
//! site content that flow through the discovery pipeline and out of the
//! CLI and HTTP surfaces.

use serde::{Deserialize, Serialize};

/// A project record loaded from a content file. Immutable after load.
///
/// JSON keys are camelCase (`techStack`, `repoUrl`, `liveUrl`), matching the
/// front-matter keys of the content files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub tech_stack: Vec<String>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub featured: bool,
}

/// A project together with its raw front matter and body text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub frontmatter: serde_json::Value,
    pub body: String,
    pub reading_minutes: u32,
}

/// Tag and tech-stack constraints. OR within a dimension, AND across them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.tech_stack.is_empty()
    }
}

/// A project matched by a search, with its score (0.0 is a perfect match).
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub project: Project,
    pub score: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<String>,
}

/// Read from snake_case TOML, served as camelCase JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SiteProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub bio: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expertise {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub company_logo: String,
    pub quote: String,
}
