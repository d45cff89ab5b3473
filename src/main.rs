//! # Folio CLI (`folio`)
//!
//! The `folio` binary browses the project catalog from the terminal and
//! starts the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./config/folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio init` | Create the state database |
//! | `folio status` | Show content and state locations and health |
//! | `folio list` | List projects, featured first |
//! | `folio search "<query>"` | Fuzzy search with optional tag/tech filters |
//! | `folio show <slug>` | Print a project with similar projects |
//! | `folio recommend <slug>` | Print similar projects |
//! | `folio sitemap` | Print the XML sitemap |
//! | `folio views` | Show (or bump) the page-view counter |
//! | `folio prefs` | Show or update preferences |
//! | `folio ask "<question>"` | Ask the FAQ chat |
//! | `folio serve` | Start the HTTP server |
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (default `info`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use folio::config::{self, Config};
use folio::models::SearchFilters;
use folio::preferences::{self, PreferencesUpdate, Theme};
use folio::store::LocalStore;
use folio::{
    analytics, chat, detail, migrate, recommend, search, server, sitemap, status,
};

/// Folio: content service for a security portfolio.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/folio.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: project catalog, fuzzy search, and site API for a security portfolio",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/folio.toml`. When the file is missing, content
    /// is read from `./content/projects` and state kept in `./data`.
    #[arg(long, global = true, default_value = "./config/folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the state database. Idempotent.
    Init,

    /// Show where content and state live and whether they are usable.
    Status,

    /// List every project, featured ones first.
    List,

    /// Fuzzy-search projects.
    ///
    /// Tag and tech filters match any of the given values within a
    /// dimension; both dimensions must match when given.
    Search {
        /// The search query string.
        query: String,

        /// Keep projects carrying this tag (repeatable).
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Keep projects using this technology (repeatable).
        #[arg(long = "tech")]
        tech: Vec<String>,
    },

    /// Print a project, its body, and similar projects.
    Show {
        /// Project slug (file name without extension).
        slug: String,
    },

    /// Print projects similar to the given one.
    Recommend {
        slug: String,

        /// Number of recommendations (defaults to `[recommend].limit`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the XML sitemap.
    Sitemap,

    /// Show the page-view counter.
    Views {
        /// Count one more view before printing.
        #[arg(long)]
        increment: bool,
    },

    /// Show preferences, or update them when flags are given.
    Prefs {
        /// `light`, `dark`, or `system`.
        #[arg(long)]
        theme: Option<Theme>,

        #[arg(long)]
        reduced_motion: Option<bool>,

        #[arg(long)]
        animations: Option<bool>,
    },

    /// Ask the FAQ chat a question.
    Ask { question: String },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config_or_minimal(path: &std::path::Path) -> anyhow::Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::minimal())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = load_config_or_minimal(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("State database initialized at {}.", cfg.state.path.display());
        }
        Commands::Status => {
            status::run_status(&cfg).await?;
        }
        Commands::List => {
            search::run_search(&cfg, "", &SearchFilters::default())?;
        }
        Commands::Search { query, tags, tech } => {
            let filters = SearchFilters {
                tags,
                tech_stack: tech,
            };
            let shown = search::run_search(&cfg, &query, &filters)?;

            let store = LocalStore::open_or_disabled(&cfg).await;
            analytics::record_search(&store, &query, &filters, shown).await;
            store.close().await;
        }
        Commands::Show { slug } => {
            detail::run_show(&cfg, &slug)?;
        }
        Commands::Recommend { slug, limit } => {
            recommend::run_recommend(&cfg, &slug, limit)?;
        }
        Commands::Sitemap => {
            sitemap::run_sitemap(&cfg)?;
        }
        Commands::Views { increment } => {
            let store = LocalStore::open_or_disabled(&cfg).await;
            let count = if increment {
                analytics::increment_page_view(&store).await
            } else {
                analytics::page_view_count(&store).await
            };
            store.close().await;
            println!("{}", count);
        }
        Commands::Prefs {
            theme,
            reduced_motion,
            animations,
        } => {
            let store = LocalStore::open_or_disabled(&cfg).await;
            let update = PreferencesUpdate {
                theme,
                reduced_motion,
                animations_enabled: animations,
            };
            let prefs = if theme.is_none() && reduced_motion.is_none() && animations.is_none() {
                preferences::load(&store).await
            } else {
                preferences::update(&store, &update).await
            };
            store.close().await;
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        Commands::Ask { question } => {
            let reply = chat::answer(&question, &cfg.site.faq, &cfg.site.profile)?;
            println!("{}", reply);
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
