use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;
use crate::state::{AppState, DashboardOptions, Input, Selection};
use crate::ui::page::render_page;

pub type SharedState = Arc<AppState>;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/update`: the current value of every input plus the
/// ids of the inputs that just changed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    pub selection: Selection,
    #[serde(default)]
    pub changed: Vec<Input>,
}

/// Plotly figures for the recomputed charts; untouched charts are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("no such route: {0}")]
    NotFound(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/update", post(update))
        .fallback(not_found)
        .with_state(state)
}

pub async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(render_page(&state.options()))
}

pub async fn options(State(state): State<SharedState>) -> Json<DashboardOptions> {
    Json(state.options())
}

pub async fn update(
    State(state): State<SharedState>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    log::debug!(
        "Update site={} payload=[{}, {}] changed={:?}",
        req.selection.site,
        req.selection.payload.low,
        req.selection.payload.high,
        req.changed
    );

    let outputs = state.recompute(&req.selection, &req.changed);
    if let Some(scatter) = &outputs.scatter {
        log::debug!("Scatter chart has {} points", scatter.point_count());
    }
    if let Some(pie) = &outputs.pie {
        log::debug!("Pie chart total {:.1}", pie.total());
    }
    Ok(Json(UpdateResponse {
        pie: outputs.pie.map(|c| c.figure()),
        scatter: outputs.scatter.map(|c| c.figure()),
    }))
}

async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config, state: SharedState) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("Dashboard running at http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving dashboard")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
    }
    log::info!("Shutting down");
}
