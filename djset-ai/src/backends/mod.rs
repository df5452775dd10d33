//! Text generation backends
//!
//! Every vendor implements [`GenerationBackend`]: one prompt in, the raw reply
//! text out. Exactly one backend is active per process, chosen once at startup
//! from the closed [`BackendKind`] set by [`build_backend`].

pub mod deepseek_client;
pub mod gemini_client;

pub use deepseek_client::DeepseekClient;
pub use gemini_client::GeminiClient;

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Transport timeout for generation calls
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Generation backend errors
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Missing credential or unknown backend name
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body lacked the expected text field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Uniform text generation capability
///
/// One outbound call per `generate`; no retries. The caller decides whether
/// to try again.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name reported to API clients
    fn name(&self) -> &'static str;

    /// Generate a reply for `prompt`, returned exactly as the vendor sent it
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Supported generation vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    Deepseek,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Gemini, BackendKind::Deepseek];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::Deepseek => "deepseek",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = BackendKind::ALL.iter().map(|k| k.as_str()).collect();
                GenerationError::Configuration(format!(
                    "Unknown generation backend '{}' (supported: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Credentials and endpoint overrides for the selected backend
#[derive(Debug, Clone, Default)]
pub struct BackendSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl BackendSettings {
    /// API key if present and not blank
    pub(crate) fn require_api_key(&self, kind: BackendKind, env_var: &str) -> Result<String, GenerationError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(GenerationError::Configuration(format!(
                "{} API key not configured. Set {} or [generation.{}] api_key in the config file",
                kind, env_var, kind
            ))),
        }
    }
}

/// Construct the backend for `kind`
///
/// Fails eagerly with [`GenerationError::Configuration`] when the backend's
/// credential is missing.
pub fn build_backend(
    kind: BackendKind,
    settings: &BackendSettings,
) -> Result<Arc<dyn GenerationBackend>, GenerationError> {
    let backend: Arc<dyn GenerationBackend> = match kind {
        BackendKind::Gemini => Arc::new(GeminiClient::new(settings)?),
        BackendKind::Deepseek => Arc::new(DeepseekClient::new(settings)?),
    };

    tracing::info!(backend = %kind, "Generation backend initialized");
    Ok(backend)
}

pub(crate) fn http_client() -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GenerationError::Configuration(format!("HTTP client init failed: {}", e)))
}
