//! # Folio
//!
//! Content service for a single-owner security portfolio.
//!
//! Folio loads project records from front-matter content files, offers
//! fuzzy search with tag and tech-stack filters, recommends similar
//! projects, and serves everything (plus site content and a little local
//! state) over a CLI and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────┐
//! │  Content    │──▶│ Search +     │──▶│ CLI / HTTP  │
//! │  .mdx files │   │ Recommend    │   │ (folio)     │
//! └─────────────┘   └──────────────┘   └──────┬──────┘
//!                                             │
//!                                      ┌──────▼──────┐
//!                                      │ SQLite kv   │
//!                                      │ (state)     │
//!                                      └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! folio init                    # create the state database
//! folio list                    # featured projects first
//! folio search "phishing" --tag Security
//! folio show ark-surveillance
//! folio serve                   # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`frontmatter`] | YAML-subset and TOML front matter |
//! | [`content`] | Project loader |
//! | [`fuzzy`] | Weighted approximate matching |
//! | [`search`] | Filtering and fuzzy search |
//! | [`recommend`] | Similar-project scoring |
//! | [`detail`] | Project page lookup |
//! | [`sitemap`] | XML sitemap |
//! | [`palette`] | Command palette |
//! | [`chat`] | FAQ chat stub |
//! | [`store`] | SQLite-backed key/value state |
//! | [`analytics`] | View counter, event log, search history |
//! | [`preferences`] | Theme and motion preferences |
//! | [`ui`] | Interaction state machines and motion math |
//! | [`server`] | HTTP server |
//! | [`status`] | Content and state health |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod analytics;
pub mod chat;
pub mod config;
pub mod content;
pub mod db;
pub mod detail;
pub mod frontmatter;
pub mod fuzzy;
pub mod migrate;
pub mod models;
pub mod palette;
pub mod preferences;
pub mod recommend;
pub mod search;
pub mod server;
pub mod sitemap;
pub mod status;
pub mod store;
pub mod ui;
