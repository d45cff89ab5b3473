//! Local key/value state store.
//!
//! The server-side counterpart of browser local storage: string keys mapped
//! to string (usually JSON) values in the `kv_store` table of the state
//! database at `[state].path`.
//!
//! When the database cannot be opened the store runs *disabled*: every
//! access returns an error, which the higher-level helpers log and replace
//! with defaults.

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db;
use crate::migrate;

pub const KEY_PREFERENCES: &str = "user-preferences";
pub const KEY_EVENTS: &str = "analytics-events";
pub const KEY_PAGE_VIEWS: &str = "page-view-count";
pub const KEY_RECENT_SEARCHES: &str = "recent-searches";

const UPSERT_SQL: &str = r#"
    INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

/// Size caps for the list-valued keys.
#[derive(Debug, Clone, Copy)]
pub struct StoreLimits {
    pub max_events: usize,
    pub max_recent_searches: usize,
}

/// Cheap to clone; clones share the pool and the write lock.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: Option<SqlitePool>,
    limits: StoreLimits,
    /// Serializes read-modify-write cycles issued from this process.
    write_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    /// Opens the state database, creating the schema if needed.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = db::connect(config)
            .await
            .with_context(|| format!("failed to open state db {}", config.state.path.display()))?;
        migrate::apply(&pool).await?;
        Ok(Self {
            pool: Some(pool),
            limits: limits_from(config),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Like [`LocalStore::open`], but falls back to a disabled store.
    pub async fn open_or_disabled(config: &Config) -> Self {
        match Self::open(config).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("state storage unavailable, using defaults: {:#}", e);
                Self::disabled(limits_from(config))
            }
        }
    }

    pub fn disabled(limits: StoreLimits) -> Self {
        Self {
            pool: None,
            limits,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow!("state storage is disabled"))
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool()?)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(value)
            .bind(chrono::Utc::now().timestamp())
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    /// Atomically adds one to an integer-valued key and returns the new value.
    /// A missing or non-numeric value counts as zero.
    pub async fn increment(&self, key: &str) -> Result<i64> {
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?, '1', ?)
            ON CONFLICT(key) DO UPDATE SET
                value = CAST(value AS INTEGER) + 1,
                updated_at = excluded.updated_at
            RETURNING CAST(value AS INTEGER)
            "#,
        )
        .bind(key)
        .bind(chrono::Utc::now().timestamp())
        .fetch_one(self.pool()?)
        .await?;
        Ok(value)
    }

    /// Reads and decodes a JSON value; any failure yields `default`.
    pub async fn get_json_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_item(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(key, "discarding undecodable stored value: {}", e);
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::debug!(key, "storage read failed: {:#}", e);
                default
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw).await
    }

    /// Reads the JSON value at `key` (or `default` when missing or
    /// undecodable), applies `f`, writes the result back, and returns it.
    ///
    /// The whole cycle runs under the store's write lock and inside one
    /// SQLite write transaction, so concurrent updates of the same key from
    /// this process or another one are applied one after the other.
    pub async fn update_json<T, F>(&self, key: &str, default: T, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let pool = self.pool()?;
        let _guard = self.write_lock.lock().await;
        let mut tx = pool.begin().await?;

        // A write statement first takes the database write lock, so another
        // process waits on busy_timeout instead of reading a stale value.
        sqlx::query("UPDATE kv_store SET updated_at = updated_at WHERE key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?;

        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;
        let current = match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(key, "discarding undecodable stored value: {}", e);
                    default
                }
            },
            None => default,
        };

        let next = f(current);
        sqlx::query(UPSERT_SQL)
            .bind(key)
            .bind(serde_json::to_string(&next)?)
            .bind(chrono::Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(next)
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

fn limits_from(config: &Config) -> StoreLimits {
    StoreLimits {
        max_events: config.state.max_events,
        max_recent_searches: config.state.max_recent_searches,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::temp_store;
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let (_tmp, store, _) = temp_store().await;
        assert_eq!(store.get_item("k").await.unwrap(), None);
        store.set_item("k", "v1").await.unwrap();
        store.set_item("k", "v2").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("v2"));
        store.remove_item("k").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_increment_from_missing_and_garbage() {
        let (_tmp, store, _) = temp_store().await;
        assert_eq!(store.increment("n").await.unwrap(), 1);
        assert_eq!(store.increment("n").await.unwrap(), 2);
        store.set_item("g", "not a number").await.unwrap();
        assert_eq!(store.increment("g").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let (_tmp, store, config) = temp_store().await;
        store.set_json("list", &vec![1, 2, 3]).await.unwrap();
        store.close().await;

        let reopened = LocalStore::open(&config).await.unwrap();
        let list: Vec<i32> = reopened.get_json_or("list", Vec::new()).await;
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_disabled_store_defaults() {
        let store = LocalStore::disabled(StoreLimits {
            max_events: 100,
            max_recent_searches: 10,
        });
        assert!(!store.is_enabled());
        assert!(store.set_item("k", "v").await.is_err());
        let v: Vec<String> = store.get_json_or("k", vec!["d".to_string()]).await;
        assert_eq!(v, vec!["d"]);
    }

    #[tokio::test]
    async fn test_update_json_applies_to_stored_value() {
        let (_tmp, store, _) = temp_store().await;
        let first = store
            .update_json("list", Vec::<i32>::new(), |mut v| {
                v.push(1);
                v
            })
            .await
            .unwrap();
        assert_eq!(first, vec![1]);

        store
            .update_json("list", Vec::<i32>::new(), |mut v| {
                v.push(2);
                v
            })
            .await
            .unwrap();
        let list: Vec<i32> = store.get_json_or("list", Vec::new()).await;
        assert_eq!(list, vec![1, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_json_keeps_every_write() {
        let (_tmp, store, _) = temp_store().await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_json("list", Vec::<i32>::new(), move |mut v| {
                        v.push(i);
                        v
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut list: Vec<i32> = store.get_json_or("list", Vec::new()).await;
        list.sort();
        assert_eq!(list, (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_update_json_on_disabled_store_errors() {
        let store = LocalStore::disabled(StoreLimits {
            max_events: 100,
            max_recent_searches: 10,
        });
        let result = store.update_json("k", 0u32, |n| n + 1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_json_defaults() {
        let (_tmp, store, _) = temp_store().await;
        store.set_item("bad", "{not json").await.unwrap();
        let v: u32 = store.get_json_or("bad", 7).await;
        assert_eq!(v, 7);
    }
}
