//! `folio status`: where content and state live and whether they are usable.

use anyhow::Result;

use crate::config::Config;
use crate::content;
use crate::store::LocalStore;

pub async fn run_status(config: &Config) -> Result<()> {
    let content_status = if content::content_dir_exists(config) {
        format!("OK ({} projects)", content::list_slugs(config).len())
    } else {
        "MISSING".to_string()
    };

    let store = LocalStore::open_or_disabled(config).await;
    let state_status = if store.is_enabled() {
        "OK"
    } else {
        "DISABLED (using defaults)"
    };
    store.close().await;

    println!("{:<10} {:<40} STATUS", "PART", "PATH");
    println!(
        "{:<10} {:<40} {}",
        "content",
        config.content.projects_dir.display(),
        content_status
    );
    println!(
        "{:<10} {:<40} {}",
        "state",
        config.state.path.display(),
        state_status
    );

    Ok(())
}
