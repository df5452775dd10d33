//! Deepseek generation client (OpenAI-compatible chat completions)

use super::{BackendKind, BackendSettings, GenerationBackend, GenerationError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEEPSEEK_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Deepseek API client
pub struct DeepseekClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl DeepseekClient {
    /// Create a client; fails if no API key is configured
    pub fn new(settings: &BackendSettings) -> Result<Self, GenerationError> {
        let api_key = settings.require_api_key(BackendKind::Deepseek, DEEPSEEK_API_KEY_ENV)?;

        Ok(Self {
            http_client: super::http_client()?,
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| DEEPSEEK_DEFAULT_MODEL.to_string()),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEEPSEEK_BASE_URL.to_string()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn extract_text(response: ChatResponse) -> Result<String, GenerationError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("missing choices[0].message.content".to_string())
            })
    }
}

#[async_trait]
impl GenerationBackend for DeepseekClient {
    fn name(&self) -> &'static str {
        BackendKind::Deepseek.as_str()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending Deepseek chat completion request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api(status.as_u16(), error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        let text = Self::extract_text(body)?;
        tracing::info!(model = %self.model, reply_chars = text.len(), "Deepseek reply received");
        Ok(text)
    }
}
