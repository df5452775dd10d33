//! Spotify authorization-code flow
//!
//! Login redirects the user to Spotify's consent page; the callback exchanges
//! the returned code for an access/refresh token pair which is persisted via
//! the [`TokenStore`]. Expired tokens are refreshed on demand.

use super::{StoredToken, TokenProvider, TokenStore, EXPIRY_SKEW_SECS};
use crate::catalog::CatalogError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Scopes needed to read the corpus playlist and write the generated one
pub const SPOTIFY_SCOPES: &str =
    "playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public";

/// Spotify application credentials
#[derive(Debug, Clone, Default)]
pub struct SpotifySettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// OAuth client and [`TokenProvider`] backed by a [`TokenStore`]
pub struct SpotifyOAuth {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    accounts_url: String,
    store: Arc<dyn TokenStore>,
    refresh_lock: Mutex<()>,
}

impl SpotifyOAuth {
    pub fn new(settings: &SpotifySettings, store: Arc<dyn TokenStore>) -> Result<Self, CatalogError> {
        let client_id = settings
            .client_id
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::Configuration(
                    "Spotify client ID not configured (set SPOTIFY_CLIENT_ID)".to_string(),
                )
            })?;
        let client_secret = settings
            .client_secret
            .clone()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::Configuration(
                    "Spotify client secret not configured (set SPOTIFY_CLIENT_SECRET)".to_string(),
                )
            })?;
        if settings.redirect_uri.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "Spotify redirect URI not configured".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Configuration(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            redirect_uri: settings.redirect_uri.clone(),
            accounts_url: SPOTIFY_ACCOUNTS_URL.to_string(),
            store,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn with_accounts_url(mut self, accounts_url: impl Into<String>) -> Self {
        self.accounts_url = accounts_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Consent page URL carrying the anti-forgery `state`
    pub fn authorize_url(&self, state: &str) -> Result<String, CatalogError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/authorize", self.accounts_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SPOTIFY_SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| CatalogError::Configuration(format!("Invalid accounts URL: {}", e)))?;

        Ok(url.into())
    }

    /// Exchange an authorization code and persist the resulting token
    pub async fn exchange_code(&self, user_id: &str, code: &str) -> Result<StoredToken, CatalogError> {
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        let token = StoredToken {
            user_id: user_id.to_string(),
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        };
        self.persist(&token).await?;

        tracing::info!(user_id = %user_id, expires_at = %token.expires_at, "Spotify login completed");
        Ok(token)
    }

    /// Refresh and persist; keeps the old refresh token when none is returned
    pub async fn refresh(&self, user_id: &str, refresh_token: &str) -> Result<StoredToken, CatalogError> {
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let token = StoredToken {
            user_id: user_id.to_string(),
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
        };
        self.persist(&token).await?;

        tracing::debug!(user_id = %user_id, expires_at = %token.expires_at, "Spotify token refreshed");
        Ok(token)
    }

    /// Forget the user's token
    pub async fn logout(&self, user_id: &str) -> Result<(), CatalogError> {
        self.store
            .delete(user_id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    /// Whether a token (possibly expired) is stored for the user
    pub async fn is_logged_in(&self, user_id: &str) -> Result<bool, CatalogError> {
        Ok(self
            .store
            .load(user_id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?
            .is_some())
    }

    async fn stored_token(&self, user_id: &str) -> Result<StoredToken, CatalogError> {
        self.store
            .load(user_id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?
            .ok_or(CatalogError::NotAuthenticated)
    }

    async fn persist(&self, token: &StoredToken) -> Result<(), CatalogError> {
        self.store
            .save(token)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, CatalogError> {
        let response = self
            .http_client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(token_error(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Map a token endpoint failure; a rejected grant means the user must log in again
fn token_error(status: u16, body: &str) -> CatalogError {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) if err.error == "invalid_grant" => {
            tracing::warn!(
                description = ?err.error_description,
                "Spotify rejected the grant; login required"
            );
            CatalogError::NotAuthenticated
        }
        Ok(err) => CatalogError::Api(
            status,
            err.error_description.unwrap_or(err.error),
        ),
        Err(_) => CatalogError::Api(status, body.to_string()),
    }
}

#[async_trait]
impl TokenProvider for SpotifyOAuth {
    async fn valid_token(&self, user_id: &str) -> Result<String, CatalogError> {
        let token = self.stored_token(user_id).await?;
        if !token.is_expired(Utc::now(), EXPIRY_SKEW_SECS) {
            return Ok(token.access_token);
        }

        // One refresh at a time; a concurrent caller may already have refreshed
        let _guard = self.refresh_lock.lock().await;
        let token = self.stored_token(user_id).await?;
        if !token.is_expired(Utc::now(), EXPIRY_SKEW_SECS) {
            return Ok(token.access_token);
        }

        let refresh_token = token.refresh_token.ok_or(CatalogError::NotAuthenticated)?;
        Ok(self.refresh(user_id, &refresh_token).await?.access_token)
    }
}
