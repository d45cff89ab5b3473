//! "Similar projects" recommendations.
//!
//! Every other project is scored by `2 × shared tags + shared tech entries`
//! against the current one, sorted by descending score, and truncated.
//! Scores are not normalized by list length: a project with many tags is
//! not penalized, which suits a small hand-curated catalog. Because of that
//! the ranking is not symmetric: A recommending B does not imply B ranks A
//! in the same position.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::content;
use crate::models::Project;

/// Tags count double relative to tech-stack entries.
pub const TAG_WEIGHT: usize = 2;
pub const TECH_WEIGHT: usize = 1;

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub project: Project,
    pub similarity: usize,
}

/// Number of entries of `candidate` that also appear in `current`.
fn shared(candidate: &[String], current: &[String]) -> usize {
    candidate.iter().filter(|x| current.contains(x)).count()
}

pub fn similarity(current: &Project, candidate: &Project) -> usize {
    TAG_WEIGHT * shared(&candidate.tags, &current.tags)
        + TECH_WEIGHT * shared(&candidate.tech_stack, &current.tech_stack)
}

/// Top `limit` projects most similar to `current`, excluding itself.
/// Ties keep catalog order.
pub fn recommend(current: &Project, all: &[Project], limit: usize) -> Vec<Recommendation> {
    let mut scored: Vec<Recommendation> = all
        .iter()
        .filter(|p| p.slug != current.slug)
        .map(|p| Recommendation {
            similarity: similarity(current, p),
            project: p.clone(),
        })
        .collect();

    scored.sort_by(|a, b| b.similarity.cmp(&a.similarity));
    scored.truncate(limit);
    scored
}

/// CLI entry point for `folio recommend <slug>`.
pub fn run_recommend(config: &Config, slug: &str, limit: Option<usize>) -> Result<()> {
    let detail = content::get_project(config, slug)
        .with_context(|| format!("project not found: {}", slug))?;
    let all = content::load_projects(config);
    let limit = limit.unwrap_or(config.recommend.limit);

    let recs = recommend(&detail.project, &all, limit);
    if recs.is_empty() {
        println!("No similar projects.");
        return Ok(());
    }

    println!("Similar to {}:", detail.project.title);
    for (i, rec) in recs.iter().enumerate() {
        println!(
            "{}. [{}] {} ({})",
            i + 1,
            rec.similarity,
            rec.project.title,
            rec.project.slug
        );
    }
    Ok(())
}
