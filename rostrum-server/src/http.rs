//! Rostrum HTTP REST API
//!
//! Axum-based HTTP server that exposes the catalog analysis and talk queries
//! over the loaded snapshot.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! pure inner function. The inner functions are directly testable without
//! axum dispatch machinery.
//!
//! Endpoints:
//! - GET  /health          — health check with snapshot status
//! - GET  /version         — server version info
//! - GET  /api/stats       — full analytics report
//! - GET  /api/talks       — filtered, paginated talk list
//! - GET  /api/talks/{id}  — single talk by sessionID or code
//! - POST /api/refresh     — re-fetch the catalog and reload the snapshot

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, RwLock};

use rostrum_core::{query, Analyzer, RostrumConfig, TalkFilter};
use rostrum_fetch::CatalogClient;

/// Default page size for /api/talks
const DEFAULT_PAGE_LIMIT: usize = 50;

/// Maximum allowed page size for /api/talks
const MAX_PAGE_LIMIT: usize = 200;

/// Shared state for all HTTP handlers. The analyzer is replaced wholesale on
/// refresh; between refreshes it is immutable.
pub struct AppState {
    pub config: RostrumConfig,
    pub analyzer: RwLock<Analyzer>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/talks", get(talks_handler))
        .route("/api/talks/:id", get(talk_handler))
        .route("/api/refresh", post(refresh_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<AppState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);
    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Rostrum HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct TalksQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub session_type: Option<String>,
    pub date: Option<String>,
    pub speaker: Option<String>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl TalksQuery {
    fn filter(&self) -> TalkFilter {
        TalkFilter {
            search: self.search.clone(),
            session_type: self.session_type.clone(),
            date: self.date.clone(),
            speaker: self.speaker.clone(),
        }
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health check — reports snapshot status.
pub fn health_inner(analyzer: &Analyzer, config: &RostrumConfig) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "talks": analyzer.len(),
            "snapshot": config.snapshot.path,
        }),
    )
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "rostrum/1",
    })
}

/// Inner stats — runs the full analysis over the current snapshot.
pub fn stats_inner(analyzer: &Analyzer) -> (StatusCode, serde_json::Value) {
    let start = Instant::now();
    let report = analyzer.full_analysis();
    let took_ms = start.elapsed().as_millis() as u64;

    match serde_json::to_value(&report) {
        Ok(mut data) => {
            if let Some(obj) = data.as_object_mut() {
                obj.insert("took_ms".to_string(), serde_json::json!(took_ms));
            }
            (StatusCode::OK, data)
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": e.to_string(),
                "status": "error",
            }),
        ),
    }
}

/// Inner talks listing — filters then paginates the raw talk list.
pub fn talks_inner(analyzer: &Analyzer, params: &TalksQuery) -> (StatusCode, serde_json::Value) {
    let matched = query::filter_talks(analyzer.talks(), &params.filter());
    let total = matched.len();

    let offset = params.offset.unwrap_or(0);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    let page: Vec<_> = matched.into_iter().skip(offset).take(limit).collect();

    match serde_json::to_value(&page) {
        Ok(talks) => (
            StatusCode::OK,
            serde_json::json!({
                "talks": talks,
                "total": total,
                "offset": offset,
                "limit": limit,
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": e.to_string(),
                "status": "error",
            }),
        ),
    }
}

/// Inner single-talk lookup — matches sessionID or code.
pub fn talk_inner(analyzer: &Analyzer, id: &str) -> (StatusCode, serde_json::Value) {
    match query::find_talk(analyzer.talks(), id) {
        Some(talk) => match serde_json::to_value(talk) {
            Ok(data) => (StatusCode::OK, data),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": e.to_string(),
                    "status": "error",
                }),
            ),
        },
        None => (
            StatusCode::NOT_FOUND,
            serde_json::json!({
                "error": format!("No talk with id '{}'", id),
                "status": "error",
            }),
        ),
    }
}

/// Inner refresh — re-fetches the catalog, rewrites the snapshot and swaps in
/// a freshly loaded analyzer. On fetch failure the previous analyzer stays in
/// service.
pub async fn refresh_inner(state: &AppState) -> (StatusCode, serde_json::Value) {
    let client = match CatalogClient::new(state.config.fetch.clone()) {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": e.to_string(),
                    "status": "error",
                }),
            );
        }
    };

    let snapshot_path = Path::new(&state.config.snapshot.path);
    let count = match rostrum_fetch::refresh_snapshot(&client, snapshot_path).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Catalog refresh failed, keeping previous snapshot: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                serde_json::json!({
                    "error": e.to_string(),
                    "status": "error",
                }),
            );
        }
    };

    match Analyzer::from_snapshot(snapshot_path) {
        Ok(analyzer) => {
            *state.analyzer.write().await = analyzer;
            (
                StatusCode::OK,
                serde_json::json!({
                    "refreshed": true,
                    "talks": count,
                }),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": e.to_string(),
                "status": "error",
            }),
        ),
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let analyzer = state.analyzer.read().await;
    let (status, body) = health_inner(&analyzer, &state.config);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let analyzer = state.analyzer.read().await;
    let (status, body) = stats_inner(&analyzer);
    (status, Json(body))
}

pub async fn talks_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TalksQuery>,
) -> impl IntoResponse {
    let analyzer = state.analyzer.read().await;
    let (status, body) = talks_inner(&analyzer, &params);
    (status, Json(body))
}

pub async fn talk_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<String>,
) -> impl IntoResponse {
    let analyzer = state.analyzer.read().await;
    let (status, body) = talk_inner(&analyzer, &id);
    (status, Json(body))
}

pub async fn refresh_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = refresh_inner(&state).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests — call inner functions directly
// ============================================================================
