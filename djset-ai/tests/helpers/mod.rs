//! Shared test doubles for djset-ai integration tests
//!
//! Stubs count their calls so tests can assert which side effects happened.

#![allow(dead_code)]

use async_trait::async_trait;
use djset_ai::auth::{SpotifyOAuth, SpotifySettings, DEFAULT_USER_ID};
use djset_ai::backends::{GenerationBackend, GenerationError};
use djset_ai::catalog::{Catalog, CatalogError, PlaylistSummary};
use djset_ai::db::{init_tables, SqliteTokenStore};
use djset_ai::services::PlaylistOrchestrator;
use djset_ai::AppState;
use djset_common::CandidateTrack;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CORPUS_NAME: &str = "DJ Set Corpus";
pub const CORPUS_ID: &str = "corpus-1";
pub const NEW_PLAYLIST_ID: &str = "new-playlist";

pub fn track(id: &str, name: &str, artists: &[&str]) -> CandidateTrack {
    CandidateTrack {
        id: id.to_string(),
        name: name.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        uri: format!("spotify:track:{}", id),
        album: "Album".to_string(),
        duration_ms: 240_000,
    }
}

pub fn salsa_corpus() -> Vec<CandidateTrack> {
    vec![
        track("t1", "Oye Como Va", &["Tito Puente"]),
        track("t2", "La Vida Es Un Carnaval", &["Celia Cruz"]),
        track("t3", "Chan Chan", &["Buena Vista Social Club"]),
    ]
}

/// Reply naming two corpus songs, with headers and ordinals as a model writes them
pub const TWO_SONG_REPLY: &str = "WARMUP:\n1. Tito Puente - Oye Como Va\n\nPEAK:\n2) Celia Cruz - La Vida Es Un Carnaval\n\nCOOLDOWN:\n";

/// Generation backend returning a canned reply
pub struct StubBackend {
    reply: Result<String, u16>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl StubBackend {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Backend whose every call fails with an API error of `status`
    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::Api(*status, "stub failure".to_string())),
        }
    }
}

/// In-memory catalog
#[derive(Default)]
pub struct StubCatalog {
    playlists: Vec<PlaylistSummary>,
    tracks: HashMap<String, Vec<CandidateTrack>>,
    unauthenticated: bool,
    pub list_calls: AtomicUsize,
    pub track_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub created: Mutex<Vec<(String, String)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubCatalog {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Catalog holding one playlist named `name`
    pub fn with_playlist(id: &str, name: &str, tracks: Vec<CandidateTrack>) -> Arc<Self> {
        let mut catalog = Self::default();
        catalog.playlists.push(PlaylistSummary {
            id: id.to_string(),
            name: name.to_string(),
            track_count: tracks.len() as u32,
        });
        catalog.tracks.insert(id.to_string(), tracks);
        Arc::new(catalog)
    }

    pub fn with_corpus(tracks: Vec<CandidateTrack>) -> Arc<Self> {
        Self::with_playlist(CORPUS_ID, CORPUS_NAME, tracks)
    }

    /// Catalog rejecting every call as unauthenticated
    pub fn unauthenticated() -> Arc<Self> {
        Arc::new(Self {
            unauthenticated: true,
            ..Self::default()
        })
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.track_calls.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
            + self.add_calls.load(Ordering::SeqCst)
    }

    fn check_auth(&self) -> Result<(), CatalogError> {
        if self.unauthenticated {
            Err(CatalogError::NotAuthenticated)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        Ok(self.playlists.clone())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<CandidateTrack>, CatalogError> {
        self.track_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        self.tracks
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("playlist {}", playlist_id)))
    }

    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<CandidateTrack>, CatalogError> {
        self.check_auth()?;
        let query = query.to_lowercase();
        Ok(self
            .tracks
            .values()
            .flatten()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Result<String, CatalogError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), description.to_string()));
        Ok(NEW_PLAYLIST_ID.to_string())
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), CatalogError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_auth()?;
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(())
    }
}

pub fn orchestrator(backend: Arc<StubBackend>, catalog: Arc<StubCatalog>) -> PlaylistOrchestrator {
    PlaylistOrchestrator::new(backend, catalog, CORPUS_NAME)
}

/// Single-connection in-memory database with the djset-ai tables
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_tables(&pool).await.unwrap();
    pool
}

pub fn spotify_settings() -> SpotifySettings {
    SpotifySettings {
        client_id: Some("test-client".to_string()),
        client_secret: Some("test-secret".to_string()),
        redirect_uri: "http://127.0.0.1:5731/callback".to_string(),
    }
}

/// App state over stubs and an in-memory token store
pub async fn test_app_state(backend: Arc<StubBackend>, catalog: Arc<StubCatalog>) -> AppState {
    let store = Arc::new(SqliteTokenStore::new(memory_pool().await));
    let oauth = Arc::new(SpotifyOAuth::new(&spotify_settings(), store).unwrap());
    let orchestrator = Arc::new(orchestrator(backend, catalog.clone()));

    AppState::new(orchestrator, catalog, oauth, DEFAULT_USER_ID)
}
