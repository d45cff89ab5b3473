//! Project search and filtering.
//!
//! # Pipeline
//!
//! 1. Filter by tags and tech stack (exact match, OR within a dimension,
//!    AND across dimensions).
//! 2. Fuzzy-match the query over title, description, tags, and tech stack
//!    (see [`crate::fuzzy`] for scoring).
//! 3. An empty query skips step 2 and returns the filtered list unscored,
//!    in its original order.

use anyhow::Result;
use std::collections::BTreeSet;

use crate::config::{Config, SearchConfig};
use crate::content;
use crate::fuzzy::Matcher;
use crate::models::{Project, SearchFilters, SearchResult};

/// Field names reported in [`SearchResult::matches`].
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_TECH_STACK: &str = "techStack";

/// Fuzzy search tuning, decoupled from application config.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub threshold: f64,
    /// Title, description, tags, tech stack.
    pub weights: [f64; 4],
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(cfg: &SearchConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            weights: cfg.weights(),
        }
    }
}

impl SearchOptions {
    fn matcher(&self) -> Matcher {
        Matcher::new(
            &[
                (FIELD_TITLE, self.weights[0]),
                (FIELD_DESCRIPTION, self.weights[1]),
                (FIELD_TAGS, self.weights[2]),
                (FIELD_TECH_STACK, self.weights[3]),
            ],
            self.threshold,
        )
    }
}

/// Keeps projects matching any selected tag and any selected tech entry.
/// An empty dimension places no constraint.
pub fn filter_projects(projects: &[Project], filters: &SearchFilters) -> Vec<Project> {
    projects
        .iter()
        .filter(|p| {
            filters.tags.is_empty() || filters.tags.iter().any(|t| p.tags.contains(t))
        })
        .filter(|p| {
            filters.tech_stack.is_empty()
                || filters.tech_stack.iter().any(|t| p.tech_stack.contains(t))
        })
        .cloned()
        .collect()
}

/// Fuzzy search. A blank query returns every project with score 0.
pub fn search_projects(
    projects: &[Project],
    query: &str,
    options: &SearchOptions,
) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return projects
            .iter()
            .map(|p| SearchResult {
                project: p.clone(),
                score: 0.0,
                matches: Vec::new(),
            })
            .collect();
    }

    options
        .matcher()
        .search(projects, query, |p| {
            vec![
                vec![p.title.as_str()],
                vec![p.description.as_str()],
                p.tags.iter().map(String::as_str).collect(),
                p.tech_stack.iter().map(String::as_str).collect(),
            ]
        })
        .into_iter()
        .map(|hit| SearchResult {
            project: projects[hit.index].clone(),
            score: hit.score,
            matches: hit.fields.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}

/// Filter, then search: the catalog listing pipeline.
pub fn discover(
    projects: &[Project],
    query: &str,
    filters: &SearchFilters,
    options: &SearchOptions,
) -> Vec<SearchResult> {
    if filters.is_empty() {
        search_projects(projects, query, options)
    } else {
        search_projects(&filter_projects(projects, filters), query, options)
    }
}

pub fn all_tags(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn all_tech_stack(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.tech_stack.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// CLI entry point: load the catalog, run the pipeline, print results.
/// Prints ranked results and returns how many were shown.
pub fn run_search(config: &Config, query: &str, filters: &SearchFilters) -> Result<usize> {
    let projects = content::load_projects(config);
    let results = discover(projects.as_slice(), query, filters, &SearchOptions::from(&config.search));

    if results.is_empty() {
        println!("No results.");
        return Ok(0);
    }

    for (i, result) in results.iter().enumerate() {
        let p = &result.project;
        let star = if p.featured { " *" } else { "" };
        println!("{}. [{:.3}] {}{}", i + 1, result.score, p.title, star);
        println!("    slug: {}", p.slug);
        if !p.tags.is_empty() {
            println!("    tags: {}", p.tags.join(", "));
        }
        if !p.tech_stack.is_empty() {
            println!("    tech: {}", p.tech_stack.join(", "));
        }
        if !result.matches.is_empty() {
            println!("    matched: {}", result.matches.join(", "));
        }
        println!();
    }
    println!("Showing {} of {} projects", results.len(), projects.len());

    Ok(results.len())
}
