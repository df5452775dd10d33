//! Spotify Web API catalog client
//!
//! Every call fetches a bearer token from the injected [`TokenProvider`] for
//! the configured user. HTTP 401 maps to [`CatalogError::NotAuthenticated`].

use super::{Catalog, CatalogError, PlaylistSummary};
use crate::auth::TokenProvider;
use async_trait::async_trait;
use djset_common::CandidateTrack;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
const PLAYLIST_PAGE_SIZE: u32 = 50;
const TRACK_PAGE_SIZE: u32 = 100;
/// Spotify accepts at most 100 URIs per add request
const ADD_TRACKS_BATCH: usize = 100;
const SEARCH_LIMIT_MAX: u32 = 50;

#[derive(Debug, Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyPlaylist {
    id: String,
    name: String,
    tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Deserialize)]
struct PlaylistTracksRef {
    total: u32,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: Option<String>,
    name: String,
    uri: String,
    #[serde(default)]
    duration_ms: u64,
    album: Option<SpotifyAlbum>,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Paging<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    id: String,
}

#[derive(Debug, Serialize)]
struct CreatePlaylistRequest<'a> {
    name: &'a str,
    description: &'a str,
    public: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
}

#[derive(Debug, Serialize)]
struct AddTracksRequest<'a> {
    uris: &'a [String],
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    snapshot_id: String,
}

impl SpotifyTrack {
    /// Convert to a candidate; episodes, local files and artistless items
    /// are not matchable
    fn into_candidate(self) -> Option<CandidateTrack> {
        if self.kind.as_deref().is_some_and(|k| k != "track") {
            return None;
        }
        let id = self.id?;
        let artists: Vec<String> = self.artists.into_iter().map(|a| a.name).collect();
        if artists.is_empty() {
            return None;
        }

        Some(CandidateTrack {
            id,
            name: self.name,
            artists,
            uri: self.uri,
            album: self.album.map(|a| a.name).unwrap_or_default(),
            duration_ms: self.duration_ms,
        })
    }
}

/// Spotify catalog bound to one user's token
pub struct SpotifyCatalog {
    http_client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    user_id: String,
    base_url: String,
}

impl SpotifyCatalog {
    pub fn new(tokens: Arc<dyn TokenProvider>, user_id: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Configuration(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            tokens,
            user_id: user_id.into(),
            base_url: SPOTIFY_API_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API URL under the base; each segment is percent-encoded so caller
    /// supplied IDs cannot leave their path position
    fn endpoint(&self, segments: &[&str]) -> Result<String, CatalogError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| CatalogError::Configuration(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                CatalogError::Configuration(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let token = self.tokens.valid_token(&self.user_id).await?;
        tracing::debug!(url = %url, "Spotify GET");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        read_json(response, url).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, CatalogError> {
        let token = self.tokens.valid_token(&self.user_id).await?;
        tracing::debug!(url = %url, "Spotify POST");

        let response = self
            .http_client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        read_json(response, url).await
    }

    /// Fetch every page starting at `url`, following `next` links
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        url: String,
        page_size: u32,
    ) -> Result<Vec<T>, CatalogError> {
        let mut items = Vec::new();
        let mut url = url;
        let mut query = vec![("limit", page_size.to_string())];

        loop {
            let page: Paging<T> = self.get_json(&url, &query).await?;
            items.extend(page.items);

            match page.next {
                Some(next) => {
                    url = next;
                    query.clear();
                }
                None => break,
            }
        }

        Ok(items)
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    resource: &str,
) -> Result<T, CatalogError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(CatalogError::NotAuthenticated);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound(resource.to_string()));
    }
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| CatalogError::Parse(e.to_string()))
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, CatalogError> {
        let url = self.endpoint(&["me", "playlists"])?;
        let playlists: Vec<SpotifyPlaylist> = self.get_all_pages(url, PLAYLIST_PAGE_SIZE).await?;

        Ok(playlists
            .into_iter()
            .map(|p| PlaylistSummary {
                id: p.id,
                name: p.name,
                track_count: p.tracks.map(|t| t.total).unwrap_or(0),
            })
            .collect())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CandidateTrack>, CatalogError> {
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;
        let items: Vec<PlaylistItem> = self.get_all_pages(url, TRACK_PAGE_SIZE).await?;
        let total_items = items.len();

        let tracks: Vec<CandidateTrack> = items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(SpotifyTrack::into_candidate)
            .collect();

        tracing::info!(
            playlist_id = %playlist_id,
            items = total_items,
            tracks = tracks.len(),
            "Fetched playlist tracks"
        );
        Ok(tracks)
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<CandidateTrack>, CatalogError> {
        let url = self.endpoint(&["search"])?;
        let params = [
            ("q", query.to_string()),
            ("type", "track".to_string()),
            ("limit", limit.clamp(1, SEARCH_LIMIT_MAX).to_string()),
        ];

        let response: SearchResponse = self.get_json(&url, &params).await?;
        Ok(response
            .tracks
            .items
            .into_iter()
            .filter_map(SpotifyTrack::into_candidate)
            .collect())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String, CatalogError> {
        let profile: UserProfile = self.get_json(&self.endpoint(&["me"])?, &[]).await?;
        let url = self.endpoint(&["users", profile.id.as_str(), "playlists"])?;

        let created: CreatedPlaylist = self
            .post_json(
                &url,
                &CreatePlaylistRequest {
                    name,
                    description,
                    public: false,
                },
            )
            .await?;

        tracing::info!(playlist_id = %created.id, name = %name, "Created Spotify playlist");
        Ok(created.id)
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        let url = self.endpoint(&["playlists", playlist_id, "tracks"])?;

        for (batch, chunk) in uris.chunks(ADD_TRACKS_BATCH).enumerate() {
            let snapshot: SnapshotResponse = self
                .post_json(&url, &AddTracksRequest { uris: chunk })
                .await?;
            tracing::debug!(
                playlist_id = %playlist_id,
                batch,
                added = chunk.len(),
                snapshot_id = %snapshot.snapshot_id,
                "Added tracks to playlist"
            );
        }

        Ok(())
    }
}
