//! Persisted user preferences (theme, motion).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::{LocalStore, KEY_PREFERENCES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        f.write_str(s)
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => anyhow::bail!("invalid theme '{}': use light, dark, or system", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub reduced_motion: bool,
    pub animations_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            reduced_motion: false,
            animations_enabled: true,
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub reduced_motion: Option<bool>,
    pub animations_enabled: Option<bool>,
}

impl UserPreferences {
    pub fn merge(mut self, update: &PreferencesUpdate) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(v) = update.reduced_motion {
            self.reduced_motion = v;
        }
        if let Some(v) = update.animations_enabled {
            self.animations_enabled = v;
        }
        self
    }

    /// Concrete theme to render; `system` follows the OS setting.
    pub fn effective_theme(&self, system_prefers_dark: bool) -> Theme {
        match self.theme {
            Theme::System if system_prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => other,
        }
    }

    /// Reduced motion applies if either the user or the OS asks for it.
    pub fn effective_reduced_motion(&self, system_reduced_motion: bool) -> bool {
        self.reduced_motion || system_reduced_motion
    }

    pub fn animations_active(&self, system_reduced_motion: bool) -> bool {
        self.animations_enabled && !self.effective_reduced_motion(system_reduced_motion)
    }
}

pub async fn load(store: &LocalStore) -> UserPreferences {
    store
        .get_json_or(KEY_PREFERENCES, UserPreferences::default())
        .await
}

/// Merges `update` into the stored preferences and returns the result.
/// When storage fails the merged value is still returned.
pub async fn update(store: &LocalStore, update: &PreferencesUpdate) -> UserPreferences {
    match store
        .update_json(KEY_PREFERENCES, UserPreferences::default(), |prefs| {
            prefs.merge(update)
        })
        .await
    {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!("error saving preferences: {:#}", e);
            load(store).await.merge(update)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::temp_store;

    #[test]
    fn test_effective_theme() {
        let mut prefs = UserPreferences::default();
        assert_eq!(prefs.effective_theme(false), Theme::Dark);
        prefs.theme = Theme::System;
        assert_eq!(prefs.effective_theme(true), Theme::Dark);
        assert_eq!(prefs.effective_theme(false), Theme::Light);
    }

    #[test]
    fn test_reduced_motion_disables_animation() {
        let prefs = UserPreferences::default();
        assert!(prefs.animations_active(false));
        assert!(!prefs.animations_active(true));
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("System".parse::<Theme>().unwrap(), Theme::System);
        assert!("blue".parse::<Theme>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let prefs: UserPreferences = serde_json::from_str(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.animations_enabled);
    }

    #[tokio::test]
    async fn test_update_merges_and_persists() {
        let (_tmp, store, _) = temp_store().await;
        assert_eq!(load(&store).await, UserPreferences::default());

        update(
            &store,
            &PreferencesUpdate {
                theme: Some(Theme::Light),
                ..Default::default()
            },
        )
        .await;
        let prefs = update(
            &store,
            &PreferencesUpdate {
                reduced_motion: Some(true),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.reduced_motion);
        assert_eq!(load(&store).await, prefs);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_partial_updates_both_land() {
        let (_tmp, store, _) = temp_store().await;

        let theme_store = store.clone();
        let theme = tokio::spawn(async move {
            update(
                &theme_store,
                &PreferencesUpdate {
                    theme: Some(Theme::Light),
                    ..Default::default()
                },
            )
            .await
        });
        let motion_store = store.clone();
        let motion = tokio::spawn(async move {
            update(
                &motion_store,
                &PreferencesUpdate {
                    reduced_motion: Some(true),
                    ..Default::default()
                },
            )
            .await
        });
        theme.await.unwrap();
        motion.await.unwrap();

        let prefs = load(&store).await;
        assert_eq!(prefs.theme, Theme::Light);
        assert!(prefs.reduced_motion);
    }
}
