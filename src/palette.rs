//! Command palette: fuzzy navigation over the site's sections.

use serde::Serialize;

use crate::fuzzy::Matcher;

#[derive(Debug, Clone, Serialize)]
pub struct Command {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub href: &'static str,
    pub keywords: &'static [&'static str],
}

impl Command {
    /// In-page anchor target (`/#about` → `about`), if this is one.
    pub fn anchor(&self) -> Option<&'static str> {
        self.href.strip_prefix("/#")
    }
}

pub const COMMANDS: &[Command] = &[
    Command {
        id: "home",
        label: "Go to Home",
        description: None,
        href: "/",
        keywords: &["home", "main"],
    },
    Command {
        id: "about",
        label: "About Me",
        description: None,
        href: "/#about",
        keywords: &["about", "bio"],
    },
    Command {
        id: "expertise",
        label: "Expertise",
        description: None,
        href: "/#expertise",
        keywords: &["skills", "capabilities"],
    },
    Command {
        id: "projects",
        label: "Projects",
        description: None,
        href: "/#projects",
        keywords: &["work", "portfolio"],
    },
    Command {
        id: "all-projects",
        label: "All Projects",
        description: None,
        href: "/projects",
        keywords: &["all", "gallery"],
    },
    Command {
        id: "faq",
        label: "FAQ",
        description: None,
        href: "/#faq",
        keywords: &["questions", "help"],
    },
    Command {
        id: "contact",
        label: "Contact",
        description: None,
        href: "/#contact",
        keywords: &["email", "reach"],
    },
];

/// Commands matching `query`, best first; all commands for a blank query.
pub fn search_commands(query: &str, threshold: f64) -> Vec<&'static Command> {
    if query.trim().is_empty() {
        return COMMANDS.iter().collect();
    }

    let matcher = Matcher::new(
        &[("label", 0.7), ("description", 0.2), ("keywords", 0.1)],
        threshold,
    );
    matcher
        .search(COMMANDS, query, |c| {
            vec![
                vec![c.label],
                c.description.into_iter().collect(),
                c.keywords.to_vec(),
            ]
        })
        .into_iter()
        .map(|hit| &COMMANDS[hit.index])
        .collect()
}

/// Palette list state: current query results and keyboard selection.
#[derive(Debug, Clone)]
pub struct Palette {
    threshold: f64,
    results: Vec<&'static Command>,
    selected: usize,
}

impl Palette {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            results: COMMANDS.iter().collect(),
            selected: 0,
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.results = search_commands(query, self.threshold);
        if self.selected >= self.results.len() {
            self.selected = 0;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn results(&self) -> &[&'static Command] {
        &self.results
    }

    pub fn selected(&self) -> Option<&'static Command> {
        self.results.get(self.selected).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_lists_all() {
        assert_eq!(search_commands("", 0.3).len(), COMMANDS.len());
    }

    #[test]
    fn test_keyword_match() {
        let hits = search_commands("email", 0.3);
        assert_eq!(hits[0].id, "contact");
    }

    #[test]
    fn test_label_beats_keyword() {
        let hits = search_commands("projects", 0.3);
        let ids: Vec<&str> = hits.iter().map(|c| c.id).collect();
        assert!(ids.starts_with(&["projects"]) || ids.starts_with(&["all-projects"]));
        assert!(ids.contains(&"projects") && ids.contains(&"all-projects"));
    }

    #[test]
    fn test_selection_clamps_and_resets() {
        let mut p = Palette::new(0.3);
        p.move_up();
        assert_eq!(p.selected().unwrap().id, "home");
        for _ in 0..20 {
            p.move_down();
        }
        assert_eq!(p.selected().unwrap().id, "contact");

        p.set_query("faq");
        assert_eq!(p.selected().unwrap().id, "faq");
        p.set_query("zzzzzzzz");
        assert!(p.selected().is_none());
    }

    #[test]
    fn test_anchor() {
        assert_eq!(COMMANDS[1].anchor(), Some("about"));
        assert_eq!(COMMANDS[0].anchor(), None);
    }
}
