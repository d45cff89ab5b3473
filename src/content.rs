//! Project content loader.
//!
//! Reads project records from the flat content directory configured in
//! `[content].projects_dir`. Each `<slug>.<ext>` file holds front matter
//! (see [`crate::frontmatter`]) followed by a free-form body.
//!
//! Loading is fail-soft: a missing or unreadable directory is logged and
//! yields an empty catalog, and a single malformed file is skipped.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::frontmatter;
use crate::models::{Project, ProjectDetail};
use crate::ui::motion::reading_minutes;

/// Typed view of the front matter keys a project file may carry.
///
/// Text fields accept any scalar, so `title: 1984` or `tags: [AI, 2024]`
/// load as strings instead of rejecting the file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFrontMatter {
    title: Option<Scalar>,
    description: Option<Scalar>,
    #[serde(default)]
    tags: Option<OneOrMany>,
    #[serde(default, alias = "tech_stack")]
    tech_stack: Option<OneOrMany>,
    image: Option<Scalar>,
    #[serde(alias = "repo_url")]
    repo_url: Option<Scalar>,
    #[serde(alias = "live_url")]
    live_url: Option<Scalar>,
    featured: Option<bool>,
}

/// A front matter scalar read as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Scalar),
    // Null list items (`- ~`) are dropped.
    Many(Vec<Option<Scalar>>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s.into()],
            OneOrMany::Many(v) => v.into_iter().flatten().map(String::from).collect(),
        }
    }
}

/// Loads every project, featured ones first. Never fails: errors are logged
/// and produce an empty list.
pub fn load_projects(config: &Config) -> Vec<Project> {
    match try_load_projects(config) {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!(
                dir = %config.content.projects_dir.display(),
                "error reading projects: {:#}",
                e
            );
            Vec::new()
        }
    }
}

fn try_load_projects(config: &Config) -> Result<Vec<Project>> {
    let mut projects = Vec::new();

    for (slug, path) in scan_content_dir(config)? {
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping unreadable project: {}", e);
                continue;
            }
        };
        match parse_project(config, &slug, &text) {
            Ok(detail) => projects.push(detail.project),
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping malformed project: {:#}", e);
            }
        }
    }

    sort_featured_first(&mut projects);
    tracing::debug!(count = projects.len(), "loaded projects");
    Ok(projects)
}

/// Stable partition: featured projects precede the rest, relative order kept.
pub fn sort_featured_first(projects: &mut [Project]) {
    projects.sort_by_key(|p| !p.featured);
}

/// Loads one project with its body. `None` when the slug is invalid or the
/// file is missing or malformed.
pub fn get_project(config: &Config, slug: &str) -> Option<ProjectDetail> {
    if let Err(e) = validate_slug(slug) {
        tracing::debug!(slug, "rejecting slug: {}", e);
        return None;
    }

    let path = project_path(config, slug);
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(slug, path = %path.display(), "error reading project: {}", e);
            return None;
        }
    };

    match parse_project(config, slug, &text) {
        Ok(detail) => Some(detail),
        Err(e) => {
            tracing::warn!(slug, "error parsing project: {:#}", e);
            None
        }
    }
}

/// All slugs in the content directory, sorted. Empty on error.
pub fn list_slugs(config: &Config) -> Vec<String> {
    match scan_content_dir(config) {
        Ok(entries) => entries.into_iter().map(|(slug, _)| slug).collect(),
        Err(e) => {
            tracing::error!("error reading project slugs: {:#}", e);
            Vec::new()
        }
    }
}

pub fn project_path(config: &Config, slug: &str) -> PathBuf {
    config
        .content
        .projects_dir
        .join(format!("{}.{}", slug, config.content.extension))
}

/// Lowercase kebab-case, as used in `/projects/<slug>` routes.
pub fn validate_slug(slug: &str) -> Result<()> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if is_valid {
        Ok(())
    } else {
        bail!("slug must be lowercase kebab-case")
    }
}

/// Returns `(slug, path)` for each content file, sorted by slug. Files
/// whose stem is not a valid slug are skipped, so every listed slug can be
/// fetched with [`get_project`].
fn scan_content_dir(config: &Config) -> Result<Vec<(String, PathBuf)>> {
    let root = &config.content.projects_dir;
    if !root.is_dir() {
        bail!("content directory does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&config.content.exclude_globs)?;
    let suffix = format!(".{}", config.content.extension);

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("failed to list {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(slug) = file_name.strip_suffix(&suffix) else {
            continue;
        };
        if slug.is_empty() || exclude_set.is_match(&file_name) {
            continue;
        }
        if let Err(e) = validate_slug(slug) {
            tracing::warn!(path = %entry.path().display(), "skipping project file: {}", e);
            continue;
        }

        entries.push((slug.to_string(), entry.path().to_path_buf()));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn parse_project(config: &Config, slug: &str, text: &str) -> Result<ProjectDetail> {
    let doc = frontmatter::parse(text)?;
    let frontmatter = serde_json::Value::Object(doc.data);
    let fm: ProjectFrontMatter = serde_json::from_value(frontmatter.clone())
        .with_context(|| format!("invalid front matter in '{}'", slug))?;

    let project = Project {
        slug: slug.to_string(),
        title: fm.title.map(String::from).unwrap_or_else(|| slug.to_string()),
        description: fm.description.map(String::from).unwrap_or_default(),
        tags: fm.tags.map(OneOrMany::into_vec).unwrap_or_default(),
        tech_stack: fm.tech_stack.map(OneOrMany::into_vec).unwrap_or_default(),
        image: fm
            .image
            .map(String::from)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| config.content.placeholder_image.clone()),
        repo_url: fm.repo_url.map(String::from),
        live_url: fm.live_url.map(String::from),
        featured: fm.featured.unwrap_or(false),
    };

    Ok(ProjectDetail {
        reading_minutes: reading_minutes(&doc.body),
        project,
        frontmatter,
        body: doc.body,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Whether the content directory exists; used by `folio status`.
pub fn content_dir_exists(config: &Config) -> bool {
    Path::new(&config.content.projects_dir).is_dir()
}
