//! HTTP server for the portfolio site.
//!
//! Serves the project catalog, project pages, site content, and the small
//! pieces of local state (view counter, preferences, search history) as a
//! JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/api/site` | Profile, expertise, FAQ, testimonials, shortcuts |
//! | `GET`  | `/api/projects` | Catalog with `q`, `tags`, `tech` query params |
//! | `GET`  | `/api/projects/{slug}` | Project page with recommendations |
//! | `GET`  | `/sitemap.xml` | XML sitemap |
//! | `GET`/`POST` | `/api/views` | Read / increment the page-view counter |
//! | `GET`/`PUT` | `/api/preferences` | Read / update user preferences |
//! | `GET`  | `/api/searches/popular` | Popular and recent search terms |
//! | `GET`  | `/api/palette` | Command palette matches for `q` |
//! | `POST` | `/api/chat` | FAQ chat reply |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "project not found: ark" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a separately hosted
//! front end can call the API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::analytics::{self, EventKind};
use crate::chat;
use crate::config::{Config, SiteConfig};
use crate::content;
use crate::detail::{self, ProjectResponse};
use crate::models::{SearchFilters, SearchResult};
use crate::palette::{self, Command};
use crate::preferences::{self, PreferencesUpdate, UserPreferences};
use crate::search::{self, SearchOptions};
use crate::sitemap;
use crate::store::LocalStore;
use crate::ui::shortcuts::{Shortcut, SHORTCUTS};

const DEFAULT_POPULAR_LIMIT: usize = 5;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: LocalStore,
}

/// Starts the HTTP server on `[server].bind`.
///
/// The state database is opened once; if it cannot be opened the server
/// still starts and the state endpoints return defaults.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let store = LocalStore::open_or_disabled(config).await;
    let app = router(Arc::new(config.clone()), store);

    tracing::info!(
        projects = content::list_slugs(config).len(),
        "folio server listening on http://{}",
        bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("folio server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

fn router(config: Arc<Config>, store: LocalStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/site", get(handle_site))
        .route("/api/projects", get(handle_catalog))
        .route("/api/projects/{slug}", get(handle_project))
        .route("/sitemap.xml", get(handle_sitemap))
        .route("/api/views", get(handle_views).post(handle_increment_views))
        .route(
            "/api/preferences",
            get(handle_get_preferences).put(handle_put_preferences),
        )
        .route("/api/searches/popular", get(handle_popular_searches))
        .route("/api/palette", get(handle_palette))
        .route("/api/chat", post(handle_chat))
        .layer(cors)
        .with_state(AppState { config, store })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps core-function errors onto HTTP statuses by message, so the core
/// functions can keep returning plain `anyhow` errors.
fn classify_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("not found") {
        not_found(msg)
    } else if msg.contains("must not be empty") || msg.contains("invalid") {
        bad_request(msg)
    } else {
        internal(msg)
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/site ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteResponse {
    #[serde(flatten)]
    site: SiteConfig,
    greeting: String,
    shortcuts: &'static [Shortcut],
    search_debounce_ms: u64,
}

async fn handle_site(State(state): State<AppState>) -> Json<SiteResponse> {
    Json(SiteResponse {
        site: state.config.site.clone(),
        greeting: chat::greeting(&state.config.site.profile),
        shortcuts: SHORTCUTS,
        search_debounce_ms: state.config.search.debounce_ms,
    })
}

// ============ GET /api/projects ============

/// Query parameters; `tags` and `tech` are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
struct CatalogParams {
    #[serde(default)]
    q: String,
    tags: Option<String>,
    tech: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    projects: Vec<SearchResult>,
    count: usize,
    total: usize,
    available_tags: Vec<String>,
    available_tech_stack: Vec<String>,
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

async fn handle_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Json<CatalogResponse> {
    let config = &state.config;
    let filters = SearchFilters {
        tags: split_csv(params.tags.as_deref()),
        tech_stack: split_csv(params.tech.as_deref()),
    };
    let query = params.q.trim();

    let projects = content::load_projects(config);
    let results = search::discover(
        &projects,
        query,
        &filters,
        &SearchOptions::from(&config.search),
    );

    analytics::record_search(&state.store, query, &filters, results.len()).await;

    Json(CatalogResponse {
        count: results.len(),
        total: projects.len(),
        available_tags: search::all_tags(&projects),
        available_tech_stack: search::all_tech_stack(&projects),
        projects: results,
    })
}

// ============ GET /api/projects/{slug} ============

async fn handle_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProjectResponse>, AppError> {
    let detail = detail::project_detail(&state.config, &slug).map_err(classify_error)?;

    analytics::track_event(
        &state.store,
        EventKind::ProjectView,
        Some(serde_json::json!({ "slug": slug })),
    )
    .await;

    Ok(Json(detail))
}

// ============ GET /sitemap.xml ============

async fn handle_sitemap(State(state): State<AppState>) -> Result<Response, AppError> {
    let xml = sitemap::render(&sitemap::entries(&state.config)).map_err(classify_error)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

// ============ /api/views ============

#[derive(Serialize)]
struct ViewsResponse {
    count: u64,
}

async fn handle_views(State(state): State<AppState>) -> Json<ViewsResponse> {
    Json(ViewsResponse {
        count: analytics::page_view_count(&state.store).await,
    })
}

async fn handle_increment_views(State(state): State<AppState>) -> Json<ViewsResponse> {
    Json(ViewsResponse {
        count: analytics::increment_page_view(&state.store).await,
    })
}

// ============ /api/preferences ============

async fn handle_get_preferences(State(state): State<AppState>) -> Json<UserPreferences> {
    Json(preferences::load(&state.store).await)
}

async fn handle_put_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Json<UserPreferences> {
    Json(preferences::update(&state.store, &update).await)
}

// ============ GET /api/searches/popular ============

#[derive(Deserialize)]
struct PopularParams {
    limit: Option<usize>,
}

#[derive(Serialize)]
struct PopularResponse {
    popular: Vec<String>,
    recent: Vec<String>,
}

async fn handle_popular_searches(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> Json<PopularResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    Json(PopularResponse {
        popular: analytics::popular_searches(&state.store, limit).await,
        recent: analytics::recent_searches(&state.store).await,
    })
}

// ============ GET /api/palette ============

#[derive(Deserialize)]
struct PaletteParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct PaletteResponse {
    commands: Vec<&'static Command>,
}

async fn handle_palette(
    State(state): State<AppState>,
    Query(params): Query<PaletteParams>,
) -> Json<PaletteResponse> {
    Json(PaletteResponse {
        commands: palette::search_commands(&params.q, state.config.search.palette_threshold),
    })
}

// ============ POST /api/chat ============

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    reply: String,
}

async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let site = &state.config.site;
    let reply = chat::answer(&request.message, &site.faq, &site.profile).map_err(classify_error)?;
    Ok(Json(ChatResponse { reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv(Some("AI, Security,,")), vec!["AI", "Security"]);
        assert!(split_csv(None).is_empty());
    }

    #[test]
    fn test_classify_error() {
        let e = classify_error(anyhow::anyhow!("project not found: x"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        let e = classify_error(anyhow::anyhow!("message must not be empty"));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        let e = classify_error(anyhow::anyhow!("disk on fire"));
        assert_eq!(e.code, "internal");
    }
}
