//! Project retrieval by slug.
//!
//! Loads a single project with its body and similar-project recommendations.
//! Used by both the `folio show` CLI command and `GET /api/projects/{slug}`.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::Config;
use crate::content;
use crate::models::Project;
use crate::recommend::{self, Recommendation};

/// Response shape for a project page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub project: Project,
    pub body: String,
    pub frontmatter: serde_json::Value,
    pub reading_minutes: u32,
    pub recommendations: Vec<Recommendation>,
}

/// Core lookup returning structured data (used by CLI and server).
pub fn project_detail(config: &Config, slug: &str) -> Result<ProjectResponse> {
    let Some(detail) = content::get_project(config, slug) else {
        bail!("project not found: {}", slug);
    };

    let all = content::load_projects(config);
    let recommendations = recommend::recommend(&detail.project, &all, config.recommend.limit);

    Ok(ProjectResponse {
        project: detail.project,
        body: detail.body,
        frontmatter: detail.frontmatter,
        reading_minutes: detail.reading_minutes,
        recommendations,
    })
}

/// CLI entry point: prints the project or exits with status 1.
pub fn run_show(config: &Config, slug: &str) -> Result<()> {
    let detail = match project_detail(config, slug) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let p = &detail.project;
    println!("--- Project ---");
    println!("slug:        {}", p.slug);
    println!("title:       {}", p.title);
    if !p.description.is_empty() {
        println!("description: {}", p.description);
    }
    println!("tags:        {}", p.tags.join(", "));
    println!("tech:        {}", p.tech_stack.join(", "));
    println!("image:       {}", p.image);
    if let Some(ref url) = p.repo_url {
        println!("repo:        {}", url);
    }
    if let Some(ref url) = p.live_url {
        println!("live:        {}", url);
    }
    println!("featured:    {}", p.featured);
    println!("reading:     {} min", detail.reading_minutes);
    println!();

    println!("--- Body ---");
    println!("{}", detail.body);
    println!();

    println!("--- Similar ({}) ---", detail.recommendations.len());
    for rec in &detail.recommendations {
        println!("{} ({}) [{}]", rec.project.title, rec.project.slug, rec.similarity);
    }

    Ok(())
}
