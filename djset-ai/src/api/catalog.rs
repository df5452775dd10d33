//! Catalog browse endpoints
//!
//! Thin pass-throughs to the [`Catalog`](crate::catalog::Catalog) so the form
//! can offer a corpus playlist picker.

use crate::catalog::PlaylistSummary;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use djset_common::CandidateTrack;
use serde::Deserialize;

const DEFAULT_SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

/// GET /api/spotify/playlists
pub async fn list_playlists(State(state): State<AppState>) -> ApiResult<Json<Vec<PlaylistSummary>>> {
    Ok(Json(state.catalog.list_playlists().await?))
}

/// GET /api/spotify/playlists/:id/tracks
pub async fn playlist_tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> ApiResult<Json<Vec<CandidateTrack>>> {
    Ok(Json(state.catalog.playlist_tracks(&playlist_id).await?))
}

/// GET /api/spotify/search?q=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<CandidateTrack>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query parameter 'q' is required".to_string()));
    }

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Ok(Json(state.catalog.search_tracks(query, limit).await?))
}

/// Build catalog browse routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/spotify/playlists", get(list_playlists))
        .route("/api/spotify/playlists/:id/tracks", get(playlist_tracks))
        .route("/api/spotify/search", get(search))
}
