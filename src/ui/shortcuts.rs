//! Keyboard shortcut chords.
//!
//! A chord is a `+`-joined string of modifiers in fixed order followed by
//! the lowercased key: `mod+shift+alt+key`. Ctrl and Meta (Cmd) both map to
//! `mod` so one binding works on every platform.

use serde::Serialize;

/// A key press as reported by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }

    pub fn with_mod(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Normalized chord string for this event.
    pub fn chord(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(4);
        if self.ctrl || self.meta {
            parts.push("mod".to_string());
        }
        if self.shift {
            parts.push("shift".to_string());
        }
        if self.alt {
            parts.push("alt".to_string());
        }
        parts.push(self.key.to_lowercase());
        parts.join("+")
    }

    /// Whether the event triggers any of `bindings`.
    pub fn matches(&self, bindings: &[&str]) -> bool {
        let chord = self.chord();
        bindings.iter().any(|b| *b == chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    OpenPalette,
    ShowHelp,
    CloseDialog,
    FocusSearch,
}

#[derive(Debug, Clone, Serialize)]
pub struct Shortcut {
    pub keys: &'static [&'static str],
    pub description: &'static str,
    pub action: ShortcutAction,
}

/// The site's global shortcuts.
pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        keys: &["mod+k"],
        description: "Open command palette",
        action: ShortcutAction::OpenPalette,
    },
    Shortcut {
        keys: &["?"],
        description: "Show keyboard shortcuts",
        action: ShortcutAction::ShowHelp,
    },
    Shortcut {
        keys: &["esc", "escape"],
        description: "Close modals/dialogs",
        action: ShortcutAction::CloseDialog,
    },
    Shortcut {
        keys: &["/"],
        description: "Focus search (on projects page)",
        action: ShortcutAction::FocusSearch,
    },
];

/// First action bound to the event, if any.
pub fn dispatch(event: &KeyEvent) -> Option<ShortcutAction> {
    SHORTCUTS
        .iter()
        .find(|s| event.matches(s.keys))
        .map(|s| s.action)
}

/// Display labels for a chord: `mod` becomes `⌘` on macOS and `Ctrl`
/// elsewhere, `esc` becomes `Esc`, anything else is upper-cased.
pub fn format_chord(chord: &str, mac: bool) -> Vec<String> {
    chord
        .split('+')
        .map(|part| match part {
            "mod" if mac => "⌘".to_string(),
            "mod" => "Ctrl".to_string(),
            "esc" => "Esc".to_string(),
            other => other.to_uppercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_order_and_case() {
        let ev = KeyEvent {
            key: "K".to_string(),
            meta: true,
            shift: true,
            alt: true,
            ctrl: false,
        };
        assert_eq!(ev.chord(), "mod+shift+alt+k");
    }

    #[test]
    fn test_ctrl_and_meta_both_mod() {
        assert!(KeyEvent::key("k").with_mod().matches(&["mod+k"]));
        let meta = KeyEvent {
            key: "k".to_string(),
            meta: true,
            ..Default::default()
        };
        assert!(meta.matches(&["mod+k"]));
        assert!(!KeyEvent::key("k").matches(&["mod+k"]));
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(
            dispatch(&KeyEvent::key("k").with_mod()),
            Some(ShortcutAction::OpenPalette)
        );
        assert_eq!(
            dispatch(&KeyEvent::key("Escape")),
            Some(ShortcutAction::CloseDialog)
        );
        assert_eq!(dispatch(&KeyEvent::key("/")), Some(ShortcutAction::FocusSearch));
        assert_eq!(dispatch(&KeyEvent::key("x")), None);
    }

    #[test]
    fn test_format_chord() {
        assert_eq!(format_chord("mod+k", true), vec!["⌘", "K"]);
        assert_eq!(format_chord("mod+k", false), vec!["Ctrl", "K"]);
        assert_eq!(format_chord("esc", false), vec!["Esc"]);
    }
}
