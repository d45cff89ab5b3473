use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::time::Duration;

use crate::config::Config;

/// Opens the state database at `[state].path`, creating it and its parent
/// directory on first use.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let path = &config.state.path;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    // CLI runs and the server may hold the file at the same time.
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_nested_parent() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::minimal();
        config.state.path = tmp.path().join("a").join("b").join("state.sqlite");

        let pool = connect(&config).await.unwrap();
        pool.close().await;
        assert!(config.state.path.exists());
    }
}
