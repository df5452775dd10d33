//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("djset-ai")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Active generation backend
    pub provider: String,
    /// Whether a catalog token is stored for the service user
    pub catalog_authenticated: bool,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Last request failure, for diagnostics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let catalog_authenticated = match state.oauth.is_logged_in(&state.user_id).await {
        Ok(logged_in) => logged_in,
        Err(e) => {
            tracing::warn!(error = %e, "Token store unavailable during health check");
            false
        }
    };

    let last_error = state.last_error.read().await.clone();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "djset-ai".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.orchestrator.provider().to_string(),
        catalog_authenticated,
        uptime_seconds,
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
