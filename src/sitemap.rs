//! XML sitemap of the site's routes.
//!
//! Lists the home page, the project catalog, and one `/projects/<slug>`
//! entry per content file. Project entries carry a `lastmod` taken from the
//! content file's modification time.

use anyhow::Result;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::Config;
use crate::content;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: &'static str,
    pub priority: f32,
}

/// Absolute base URL: `[site.profile].site_url`, else the server bind address.
pub fn base_url(config: &Config) -> String {
    let configured = config.site.profile.site_url.trim().trim_end_matches('/');
    if configured.is_empty() {
        format!("http://{}", config.server.bind)
    } else {
        configured.to_string()
    }
}

pub fn entries(config: &Config) -> Vec<SitemapEntry> {
    let base = base_url(config);
    let mut entries = vec![
        SitemapEntry {
            loc: format!("{}/", base),
            lastmod: None,
            changefreq: "weekly",
            priority: 1.0,
        },
        SitemapEntry {
            loc: format!("{}/projects", base),
            lastmod: None,
            changefreq: "weekly",
            priority: 0.8,
        },
    ];

    for slug in content::list_slugs(config) {
        let lastmod = std::fs::metadata(content::project_path(config, &slug))
            .and_then(|m| m.modified())
            .ok()
            .map(|t| DateTime::<Utc>::from(t).format("%Y-%m-%d").to_string());
        entries.push(SitemapEntry {
            loc: format!("{}/projects/{}", base, slug),
            lastmod,
            changefreq: "monthly",
            priority: 0.7,
        });
    }

    entries
}

pub fn render(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        if let Some(lastmod) = &entry.lastmod {
            write_text_element(&mut writer, "lastmod", lastmod)?;
        }
        write_text_element(&mut writer, "changefreq", entry.changefreq)?;
        write_text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn run_sitemap(config: &Config) -> Result<()> {
    println!("{}", render(&entries(config))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sitemap_lists_every_slug() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ark.mdx"), "---\ntitle: Ark\n---\n").unwrap();
        fs::write(tmp.path().join("collegia.mdx"), "---\ntitle: Collegia\n---\n").unwrap();

        let mut config = Config::minimal();
        config.content.projects_dir = tmp.path().to_path_buf();
        config.site.profile.site_url = "https://example.dev/".to_string();

        let entries = entries(&config);
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].loc, "https://example.dev/");
        assert_eq!(entries[2].loc, "https://example.dev/projects/ark");
        assert!(entries[2].lastmod.is_some());

        let xml = render(&entries).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://example.dev/projects/collegia</loc>"));
        assert!(xml.contains(SITEMAP_NS));
    }

    #[test]
    fn test_skips_files_without_a_valid_slug() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Red_Team.mdx"), "---\ntitle: Red Team\n---\n").unwrap();
        fs::write(tmp.path().join("ark.mdx"), "---\ntitle: Ark\n---\n").unwrap();

        let mut config = Config::minimal();
        config.content.projects_dir = tmp.path().to_path_buf();
        config.site.profile.site_url = "https://example.dev".to_string();

        let locs: Vec<String> = entries(&config).into_iter().map(|e| e.loc).collect();
        assert_eq!(locs.len(), 3);
        assert_eq!(locs[2], "https://example.dev/projects/ark");
        assert!(locs.iter().all(|l| !l.contains("Red_Team")));
    }

    #[test]
    fn test_escapes_text() {
        let xml = render(&[SitemapEntry {
            loc: "https://example.dev/?a=1&b=2".to_string(),
            lastmod: None,
            changefreq: "monthly",
            priority: 0.5,
        }])
        .unwrap();
        assert!(xml.contains("a=1&amp;b=2"));
    }

    #[test]
    fn test_missing_content_dir_still_has_static_routes() {
        let mut config = Config::minimal();
        config.content.projects_dir = "/definitely/not/here".into();
        assert_eq!(entries(&config).len(), 2);
    }
}
