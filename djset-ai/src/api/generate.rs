//! Playlist generation endpoint
//!
//! POST /api/generate-playlist runs one brief through the pipeline and
//! returns the generated set with its match statistics.

use crate::models::{AssemblyReport, AssemblyRequest, SetBrief};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

/// Successful generation envelope
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: GenerateData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateData {
    /// Reply text exactly as the backend produced it
    pub playlist: String,
    pub provider: String,
    pub inputs: SetBrief,
    pub total_songs: usize,
    pub found_songs: usize,
    pub not_found_songs: usize,
    pub not_found: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_playlist_id: Option<String>,
}

impl From<AssemblyReport> for GenerateData {
    fn from(report: AssemblyReport) -> Self {
        let result = report.result;
        Self {
            total_songs: result.total_parsed_songs,
            found_songs: result.matched_uris.len(),
            not_found_songs: result.unmatched_entries.len(),
            not_found: result.unmatched_entries,
            playlist: result.raw_generated_text,
            provider: report.provider,
            inputs: report.brief,
            new_playlist_id: report.new_playlist_id,
        }
    }
}

/// POST /api/generate-playlist
///
/// **Request:** `{"venue", "date", "style", "sourceCorpusId"?, "createPlaylist"?}`
///
/// **Errors:**
/// - 400: missing/blank fields, bad date, unreadable body
/// - 404: corpus playlist not found
/// - 303 to /login: no catalog token
/// - 500: backend, catalog or configuration failure
pub async fn generate_playlist(
    State(state): State<AppState>,
    payload: Result<Json<AssemblyRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    match state.orchestrator.assemble(&request).await {
        Ok(report) => {
            tracing::info!(
                run_id = %report.run_id,
                provider = %report.provider,
                new_playlist_id = ?report.new_playlist_id,
                "Playlist generated"
            );
            Ok(Json(GenerateResponse {
                success: true,
                data: report.into(),
            }))
        }
        Err(e) => {
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

/// Build generation routes
pub fn generate_routes() -> Router<AppState> {
    Router::new().route("/api/generate-playlist", post(generate_playlist))
}
