//! Catalog user authentication
//!
//! Catalog clients never hold tokens themselves. They ask a [`TokenProvider`]
//! for a currently valid bearer token on each call; the provider refreshes
//! and persists through a [`TokenStore`].

pub mod pending_states;
pub mod spotify_oauth;

pub use pending_states::PendingStates;
pub use spotify_oauth::{SpotifyOAuth, SpotifySettings};

use crate::catalog::CatalogError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Single-user deployments store their token under this key
pub const DEFAULT_USER_ID: &str = "default";

/// Refresh tokens this long before they actually expire
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// Source of valid bearer tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Token valid right now for `user_id`, refreshing if needed
    ///
    /// Returns [`CatalogError::NotAuthenticated`] when the user must log in.
    async fn valid_token(&self, user_id: &str) -> Result<String, CatalogError>;
}

/// Persisted token for one catalog user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Expired at `now`, or within `skew_secs` of expiry
    pub fn is_expired(&self, now: DateTime<Utc>, skew_secs: i64) -> bool {
        self.expires_at - Duration::seconds(skew_secs) <= now
    }
}

/// Token persistence
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self, user_id: &str) -> djset_common::Result<Option<StoredToken>>;

    /// Insert or replace the user's token
    async fn save(&self, token: &StoredToken) -> djset_common::Result<()>;

    async fn delete(&self, user_id: &str) -> djset_common::Result<()>;
}
