//! Google Gemini generation client
//!
//! `POST {base}/v1beta/models/{model}:generateContent?key=...`, reply text at
//! `candidates[0].content.parts[0].text`.

use super::{BackendKind, BackendSettings, GenerationBackend, GenerationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client; fails if no API key is configured
    pub fn new(settings: &BackendSettings) -> Result<Self, GenerationError> {
        let api_key = settings.require_api_key(BackendKind::Gemini, GEMINI_API_KEY_ENV)?;

        Ok(Self {
            http_client: super::http_client()?,
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| GEMINI_DEFAULT_MODEL.to_string()),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                GenerationError::MalformedResponse(
                    "missing candidates[0].content.parts[0].text".to_string(),
                )
            })
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    fn name(&self) -> &'static str {
        BackendKind::Gemini.as_str()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(status.as_u16(), error_text));
        }

        let body: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.without_url().to_string()))?;

        let text = Self::extract_text(body)?;
        tracing::info!(model = %self.model, reply_chars = text.len(), "Gemini reply received");
        Ok(text)
    }
}
