//! djset-ai library interface
//!
//! Exposes the pipeline, its capabilities and the HTTP router for the binary
//! and for integration tests.

pub mod api;
pub mod auth;
pub mod backends;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::auth::{PendingStates, SpotifyOAuth};
use crate::catalog::Catalog;
use crate::services::PlaylistOrchestrator;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Pipeline over the configured backend and catalog
    pub orchestrator: Arc<PlaylistOrchestrator>,
    /// Same catalog the orchestrator uses, for the browse endpoints
    pub catalog: Arc<dyn Catalog>,
    pub oauth: Arc<SpotifyOAuth>,
    /// Catalog user whose token requests run under
    pub user_id: String,
    /// Outstanding OAuth `state` values issued by /login
    pub oauth_states: Arc<RwLock<PendingStates>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last failure for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<PlaylistOrchestrator>,
        catalog: Arc<dyn Catalog>,
        oauth: Arc<SpotifyOAuth>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            orchestrator,
            catalog,
            oauth,
            user_id: user_id.into(),
            oauth_states: Arc::new(RwLock::new(PendingStates::default())),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::generate_routes())
        .merge(api::oauth_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
