//! Configuration file model and loading
//!
//! The TOML file is optional. A missing file is not an error: the service
//! starts with compiled defaults and environment/CLI overrides.
//!
//! ```toml
//! [server]
//! port = 5731
//!
//! [generation]
//! backend = "gemini"
//!
//! [generation.gemini]
//! api_key = "..."
//!
//! [spotify]
//! client_id = "..."
//! client_secret = "..."
//! redirect_uri = "http://127.0.0.1:5731/callback"
//! default_playlist_name = "DJ Set Corpus"
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5731;

/// Default generation backend name
pub const DEFAULT_BACKEND: &str = "gemini";

/// Default name of the catalog playlist used as corpus when none is given
pub const DEFAULT_CORPUS_PLAYLIST: &str = "DJ Set Corpus";

/// Root of the TOML configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub spotify: SpotifyConfig,

    /// SQLite database path (token store)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

/// Generation backend section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Selected backend name (`gemini`, `deepseek`)
    #[serde(default)]
    pub backend: Option<String>,

    #[serde(default)]
    pub gemini: BackendConfig,

    #[serde(default)]
    pub deepseek: BackendConfig,
}

/// Per-backend credentials and endpoint overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,
}

/// Spotify OAuth client and corpus settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpotifyConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Playlist resolved by name when a request names no corpus
    #[serde(default)]
    pub default_playlist_name: Option<String>,
}

/// Logging section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file location: `<config dir>/djset/djset-ai.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("djset").join("djset-ai.toml"))
        .unwrap_or_else(|| PathBuf::from("djset-ai.toml"))
}

/// Default database location: `<local data dir>/djset/djset.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("djset").join("djset.db"))
        .unwrap_or_else(|| PathBuf::from("./djset_data/djset.db"))
}

/// Parse TOML configuration from a string
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Read TOML configuration from a file without logging
///
/// Returns `None` when the file does not exist. Used before tracing is
/// initialized, since the file may carry the log level.
pub fn read_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    parse_toml_config(&content).map(Some)
}

/// Load TOML configuration from a file
///
/// A missing file logs a warning and yields defaults. A file that exists but
/// cannot be read or parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    match read_toml_config(path)? {
        Some(config) => Ok(config),
        None => {
            warn!(
                "Config file not found at {}; using defaults and environment",
                path.display()
            );
            Ok(TomlConfig::default())
        }
    }
}
