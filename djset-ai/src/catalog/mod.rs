//! Song catalog capability
//!
//! The pipeline reads its corpus from, and writes generated playlists to, a
//! [`Catalog`]. The production implementation is [`SpotifyCatalog`]; tests
//! inject stubs.

pub mod spotify_client;

pub use spotify_client::SpotifyCatalog;

use async_trait::async_trait;
use djset_common::CandidateTrack;
use serde::Serialize;
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No valid user token; the caller should send the user through login
    #[error("Not authenticated with the catalog")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Playlist listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: u32,
}

/// Catalog capability: track lookup, search and playlist CRUD
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Playlists owned or followed by the current user
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, CatalogError>;

    /// All tracks of a playlist, in playlist order
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CandidateTrack>, CatalogError>;

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<CandidateTrack>, CatalogError>;

    /// Create an empty playlist, returning its ID
    async fn create_playlist(&self, name: &str, description: &str) -> Result<String, CatalogError>;

    /// Append tracks in the given order
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError>;

    /// Resolve a playlist ID by name (case-insensitive, first match)
    async fn find_playlist_by_name(&self, name: &str) -> Result<Option<String>, CatalogError> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .list_playlists()
            .await?
            .into_iter()
            .find(|p| p.name.trim().to_lowercase() == wanted)
            .map(|p| p.id))
    }
}
