//! Configuration resolution for djset-ai
//!
//! Priority, highest first: CLI flags (clap, including their `DJSET_*` env
//! bindings) → vendor environment variables → TOML file → compiled defaults.
//! The log level is settled in `main` before tracing starts.

use crate::auth::SpotifySettings;
use crate::backends::deepseek_client::DEEPSEEK_API_KEY_ENV;
use crate::backends::gemini_client::GEMINI_API_KEY_ENV;
use crate::backends::{BackendKind, BackendSettings};
use djset_common::config::{
    default_database_path, BackendConfig, TomlConfig, DEFAULT_BACKEND, DEFAULT_CORPUS_PLAYLIST,
};
use djset_common::{Error, Result};
use std::path::PathBuf;
use tracing::{info, warn};

pub const SPOTIFY_CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET_ENV: &str = "SPOTIFY_CLIENT_SECRET";
pub const SPOTIFY_REDIRECT_URI_ENV: &str = "SPOTIFY_REDIRECT_URI";
pub const CORPUS_PLAYLIST_ENV: &str = "DJSET_CORPUS_PLAYLIST";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub backend: Option<String>,
    pub database_path: Option<PathBuf>,
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub backend: BackendKind,
    pub backend_settings: BackendSettings,
    pub spotify: SpotifySettings,
    /// Playlist used as corpus when a request names none
    pub corpus_playlist: String,
    pub database_path: PathBuf,
}

impl Settings {
    /// Resolve settings from the TOML file, environment and CLI
    ///
    /// An unknown backend name is a configuration error. Missing credentials
    /// are not checked here; the backend and OAuth constructors reject them.
    pub fn resolve(toml_config: &TomlConfig, cli: &CliOverrides) -> Result<Self> {
        let port = cli.port.unwrap_or(toml_config.server.port);

        let backend_name = cli
            .backend
            .clone()
            .or_else(|| toml_config.generation.backend.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        let backend: BackendKind = backend_name
            .parse()
            .map_err(|e: crate::backends::GenerationError| Error::Config(e.to_string()))?;

        let (backend_config, key_env) = match backend {
            BackendKind::Gemini => (&toml_config.generation.gemini, GEMINI_API_KEY_ENV),
            BackendKind::Deepseek => (&toml_config.generation.deepseek, DEEPSEEK_API_KEY_ENV),
        };
        let backend_settings = resolve_backend_settings(backend_config, key_env);

        let spotify_toml = &toml_config.spotify;
        let spotify = SpotifySettings {
            client_id: resolve_value(
                "Spotify client ID",
                SPOTIFY_CLIENT_ID_ENV,
                spotify_toml.client_id.as_ref(),
            ),
            client_secret: resolve_value(
                "Spotify client secret",
                SPOTIFY_CLIENT_SECRET_ENV,
                spotify_toml.client_secret.as_ref(),
            ),
            redirect_uri: resolve_value(
                "Spotify redirect URI",
                SPOTIFY_REDIRECT_URI_ENV,
                spotify_toml.redirect_uri.as_ref(),
            )
            .unwrap_or_else(|| default_redirect_uri(port)),
        };

        let corpus_playlist = resolve_value(
            "Corpus playlist name",
            CORPUS_PLAYLIST_ENV,
            spotify_toml.default_playlist_name.as_ref(),
        )
        .unwrap_or_else(|| DEFAULT_CORPUS_PLAYLIST.to_string());

        let database_path = cli
            .database_path
            .clone()
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(default_database_path);

        Ok(Self {
            port,
            backend,
            backend_settings,
            spotify,
            corpus_playlist,
            database_path,
        })
    }
}

/// Callback URL served by this process
pub fn default_redirect_uri(port: u16) -> String {
    format!("http://127.0.0.1:{}/callback", port)
}

fn resolve_backend_settings(config: &BackendConfig, key_env: &str) -> BackendSettings {
    BackendSettings {
        api_key: resolve_value("Generation API key", key_env, config.api_key.as_ref()),
        model: config.model.clone().filter(|m| is_valid_value(m)),
        base_url: config.base_url.clone().filter(|u| is_valid_value(u)),
    }
}

/// Environment variable first, then TOML; blank values count as unset
fn resolve_value(label: &str, env_var: &str, toml_value: Option<&String>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    match (env_value, toml_value) {
        (Some(value), Some(_)) => {
            warn!(
                "{} found in both environment ({}) and TOML. Using environment.",
                label, env_var
            );
            Some(value)
        }
        (Some(value), None) => {
            info!("{} loaded from environment variable {}", label, env_var);
            Some(value)
        }
        (None, Some(value)) => {
            info!("{} loaded from TOML config", label);
            Some(value.clone())
        }
        (None, None) => None,
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_value() {
        assert!(is_valid_value("abc"));
        assert!(!is_valid_value(""));
        assert!(!is_valid_value("   "));
    }

    #[test]
    fn test_default_redirect_uri_follows_port() {
        assert_eq!(default_redirect_uri(8080), "http://127.0.0.1:8080/callback");
    }
}
