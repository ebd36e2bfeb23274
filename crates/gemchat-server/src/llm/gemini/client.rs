// crates/gemchat-server/src/llm/gemini/client.rs
// Google Gemini generateContent client (non-streaming, single turn)

use crate::error::{RelayError, Result};
use crate::http::{DEFAULT_TIMEOUT, create_shared_client};
use gemchat_types::{
    ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use std::time::Instant;
use tracing::{Span, debug, error, info, instrument};
use uuid::Uuid;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Sampling parameters attached to every relayed message
pub const RELAY_GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    max_output_tokens: 1000,
    temperature: 0.7,
    top_p: 0.8,
    top_k: 40,
};

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client with default model and endpoint
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        Self::with_http_client(
            api_key,
            model,
            DEFAULT_API_BASE.to_string(),
            create_shared_client(DEFAULT_TIMEOUT),
        )
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(
        api_key: String,
        model: String,
        api_base: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            api_key,
            model,
            api_base,
            http: client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// generateContent URL without the key
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    /// Send one generateContent request and return the first candidate's text.
    ///
    /// Non-success statuses come back as `Upstream` carrying the same status,
    /// a success body without text as `Protocol`.
    #[instrument(skip(self, request), fields(request_id, model = %self.model))]
    pub async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", &request_id);

        info!(
            request_id = %request_id,
            part_count = request.contents.iter().map(|c| c.parts.len()).sum::<usize>(),
            "Starting Gemini generateContent request"
        );

        // Gemini authenticates via query-string key, not a bearer header
        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.message().map(str::to_string))
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));

            error!(
                request_id = %request_id,
                status = status.as_u16(),
                duration_ms,
                error = %message,
                "Gemini API error"
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                error!(request_id = %request_id, error = %e, "Failed to parse Gemini response");
                return Err(RelayError::Protocol);
            }
        };

        let Some(text) = data.first_text() else {
            error!(request_id = %request_id, body = %body, "Unexpected API response format");
            return Err(RelayError::Protocol);
        };

        info!(
            request_id = %request_id,
            duration_ms,
            reply_len = text.len(),
            "Gemini request complete"
        );
        debug!(request_id = %request_id, "Gemini reply: {}", text);

        Ok(text.to_string())
    }
}
