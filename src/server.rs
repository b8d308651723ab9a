// Education Finder - Web Server
// HTML page plus a small JSON API with Axum

use crate::error::LoadError;
use crate::filter::{filter, Criteria};
use crate::loader::Loaded;
use crate::page::{render_error_page, render_page};
use crate::record::Table;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// The dataset every request sees: loaded once at startup, never mutated.
///
/// A failed load is kept as its message so the page can show it instead of
/// guessing at partial data.
#[derive(Debug)]
pub enum Dataset {
    Ready(Table),
    Failed(String),
}

impl Dataset {
    pub fn from_load(result: std::result::Result<Loaded, LoadError>) -> Self {
        match result {
            Ok(loaded) => Dataset::Ready(loaded.table),
            Err(err) => {
                tracing::error!(error = %err, "dataset failed to load");
                Dataset::Failed(err.user_message())
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    fn failed(message: &str) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            error: Some(message.to_string()),
        }
    }
}

/// Dropdown values
#[derive(Serialize)]
struct OptionsResponse {
    countries: Vec<String>,
    fields: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - The finder page
async fn index(State(state): State<AppState>, Query(criteria): Query<Criteria>) -> Response {
    match state.dataset.as_ref() {
        Dataset::Ready(table) => Html(render_page(table, &criteria)).into_response(),
        Dataset::Failed(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_error_page(message)),
        )
            .into_response(),
    }
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/universities - Filtered records
async fn list_universities(
    State(state): State<AppState>,
    Query(criteria): Query<Criteria>,
) -> Response {
    match state.dataset.as_ref() {
        Dataset::Ready(table) => {
            let rows = filter(table, &criteria);
            tracing::debug!(?criteria, matches = rows.len(), "filtered universities");
            (StatusCode::OK, Json(ApiResponse::ok(rows))).into_response()
        }
        Dataset::Failed(message) => unavailable(message),
    }
}

/// GET /api/options - Values for the country and field dropdowns
async fn list_options(State(state): State<AppState>) -> Response {
    match state.dataset.as_ref() {
        Dataset::Ready(table) => {
            let options = OptionsResponse {
                countries: table.country_options(),
                fields: table.field_options(),
            };
            (StatusCode::OK, Json(ApiResponse::ok(options))).into_response()
        }
        Dataset::Failed(message) => unavailable(message),
    }
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiResponse::failed(message)),
    )
        .into_response()
}

// ============================================================================
// Router & Server
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/universities", get(list_universities))
        .route("/options", get(list_options));

    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
