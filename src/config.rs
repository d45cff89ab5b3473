use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Expertise, FaqItem, SiteProfile, Testimonial};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    pub state: StateConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub projects_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,
}

fn default_extension() -> String {
    "mdx".to_string()
}
fn default_placeholder_image() -> String {
    "/images/projects/placeholder.jpg".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_palette_threshold")]
    pub palette_threshold: f64,
    #[serde(default = "default_title_weight")]
    pub title_weight: f64,
    #[serde(default = "default_description_weight")]
    pub description_weight: f64,
    #[serde(default = "default_minor_weight")]
    pub tags_weight: f64,
    #[serde(default = "default_minor_weight")]
    pub tech_weight: f64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            palette_threshold: default_palette_threshold(),
            title_weight: default_title_weight(),
            description_weight: default_description_weight(),
            tags_weight: default_minor_weight(),
            tech_weight: default_minor_weight(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_threshold() -> f64 {
    0.4
}
fn default_palette_threshold() -> f64 {
    0.3
}
fn default_title_weight() -> f64 {
    0.5
}
fn default_description_weight() -> f64 {
    0.3
}
fn default_minor_weight() -> f64 {
    0.1
}
fn default_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendConfig {
    #[serde(default = "default_recommend_limit")]
    pub limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            limit: default_recommend_limit(),
        }
    }
}

fn default_recommend_limit() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    pub path: PathBuf,
    #[serde(default = "default_max_events")]
    pub max_events: usize,
    #[serde(default = "default_max_recent_searches")]
    pub max_recent_searches: usize,
}

fn default_max_events() -> usize {
    100
}
fn default_max_recent_searches() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

/// Static site content: profile, expertise panels, FAQ, testimonials.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub profile: SiteProfile,
    #[serde(default)]
    pub expertise: Vec<Expertise>,
    #[serde(default)]
    pub faq: Vec<FaqItem>,
    #[serde(default)]
    pub testimonials: Vec<Testimonial>,
}

impl SearchConfig {
    /// Field weights in title, description, tags, tech order.
    pub fn weights(&self) -> [f64; 4] {
        [
            self.title_weight,
            self.description_weight,
            self.tags_weight,
            self.tech_weight,
        ]
    }
}

impl Config {
    /// Configuration used when no file is available: content under
    /// `./content/projects`, state under `./data/folio.sqlite`.
    pub fn minimal() -> Self {
        Self {
            content: ContentConfig {
                projects_dir: PathBuf::from("./content/projects"),
                extension: default_extension(),
                exclude_globs: Vec::new(),
                placeholder_image: default_placeholder_image(),
            },
            search: SearchConfig::default(),
            recommend: RecommendConfig::default(),
            state: StateConfig {
                path: PathBuf::from("./data/folio.sqlite"),
                max_events: default_max_events(),
                max_recent_searches: default_max_recent_searches(),
            },
            server: ServerConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.content.extension.trim().is_empty() {
        anyhow::bail!("content.extension must not be empty");
    }

    for (name, value) in [
        ("search.threshold", config.search.threshold),
        ("search.palette_threshold", config.search.palette_threshold),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            anyhow::bail!("{} must be in (0.0, 1.0]", name);
        }
    }

    if config.search.weights().iter().any(|w| *w <= 0.0) {
        anyhow::bail!("search weights must be > 0");
    }

    if config.recommend.limit < 1 {
        anyhow::bail!("recommend.limit must be >= 1");
    }

    if config.state.max_events == 0 || config.state.max_recent_searches == 0 {
        anyhow::bail!("state.max_events and state.max_recent_searches must be > 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &str) -> Result<Config> {
        let text = format!(
            r#"
[content]
projects_dir = "content/projects"

[state]
path = "data/folio.sqlite"
{}
"#,
            extra
        );
        let config: Config = toml::from_str(&text)?;
        validate(&config)?;
        Ok(config)
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse("").unwrap();
        assert_eq!(config.content.extension, "mdx");
        assert_eq!(config.search.threshold, 0.4);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.recommend.limit, 3);
        assert_eq!(config.state.max_events, 100);
        assert_eq!(config.server.bind, "127.0.0.1:7340");
        assert!(config.site.faq.is_empty());
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let err = parse("[search]\nthreshold = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("search.threshold"));
    }

    #[test]
    fn test_rejects_zero_limit() {
        assert!(parse("[recommend]\nlimit = 0\n").is_err());
    }

    #[test]
    fn test_site_sections_parse() {
        let config = parse(
            r#"
[site.profile]
name = "Jane Doe"
role = "Security Analyst"

[[site.faq]]
id = "1"
question = "How do I start a project with you?"
answer = "Reach out via email."
"#,
        )
        .unwrap();
        assert_eq!(config.site.profile.name, "Jane Doe");
        assert_eq!(config.site.faq.len(), 1);
    }
}
