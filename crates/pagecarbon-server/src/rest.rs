//! HTTP REST API.
//!
//! `GET /api/health` for liveness and `POST /api/audit` with
//! `{"url": "..."}` to audit a page.

use crate::config::ServerConfig;
use crate::report::{AuditReport, Coefficients};
use anyhow::Context;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pagecarbon::{AuditError, Auditor};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for all handlers.
pub struct AppState {
    pub auditor: Auditor,
    pub coefficients: Coefficients,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let auditor = Auditor::new(config.audit.clone()).context("failed to create auditor")?;
        Ok(Self {
            auditor,
            coefficients: config.coefficients,
        })
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/audit", post(handle_audit))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API until the process is stopped.
pub async fn start(config: &ServerConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("API listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[derive(Deserialize)]
struct AuditRequest {
    url: Option<String>,
}

async fn handle_audit(
    State(state): State<Arc<AppState>>,
    body: Option<Json<AuditRequest>>,
) -> Response {
    let Some(url) = body.and_then(|Json(req)| req.url) else {
        return error_response(StatusCode::BAD_REQUEST, "Provide a valid http(s) URL");
    };

    match state.auditor.audit(&url).await {
        Ok(result) => Json(AuditReport::build(&result, &state.coefficients)).into_response(),
        Err(AuditError::InvalidInput(_)) => {
            error_response(StatusCode::BAD_REQUEST, "Provide a valid http(s) URL")
        }
        Err(AuditError::PageFetch { .. }) => {
            error_response(StatusCode::BAD_REQUEST, "Failed to fetch URL")
        }
        Err(e) => {
            error!("audit of {url} failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
