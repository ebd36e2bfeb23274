// crates/gemchat-server/src/relay/mod.rs
// Relay core: validate a chat message and forward it to Gemini

pub mod routes;
pub mod server;

pub use routes::create_router;
pub use server::RelayServer;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::http::create_shared_client;
use crate::llm::gemini::{GeminiClient, RELAY_GENERATION_CONFIG};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gemchat_types::{GenerateContentRequest, InlineData, RelayRequest};
use gemchat_widget::attachment;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared state for the relay handlers
#[derive(Clone, Default)]
pub struct RelayState {
    /// None when no API key is configured; every chat call then fails
    pub gemini: Option<Arc<GeminiClient>>,
    pub static_dir: Option<PathBuf>,
}

impl RelayState {
    pub fn new(gemini: Option<GeminiClient>) -> Self {
        Self {
            gemini: gemini.map(Arc::new),
            static_dir: None,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        let http = create_shared_client(config.request_timeout);
        let gemini = config.api_key.clone().map(|key| {
            GeminiClient::with_http_client(
                key,
                config.model.clone(),
                config.api_base.clone(),
                http,
            )
        });

        let state = Self::new(gemini);
        match &config.static_dir {
            Some(dir) => state.with_static_dir(dir),
            None => state,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

/// Relay one chat message. Returns the model's reply text unmodified.
pub async fn relay(gemini: Option<&GeminiClient>, request: RelayRequest) -> Result<String> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(RelayError::MissingInput);
    }

    let image = request.image.map(validate_image).transpose()?;
    let gemini = gemini.ok_or_else(RelayError::missing_api_key)?;

    info!(
        message_len = message.len(),
        has_image = image.is_some(),
        model = %gemini.model(),
        "Relaying chat message"
    );

    let body = GenerateContentRequest::single_turn(Some(message), image)
        .with_generation_config(RELAY_GENERATION_CONFIG);
    gemini.generate_content(&body).await
}

/// Same acceptance rule the widget applies when staging, plus base64 checks
fn validate_image(image: InlineData) -> Result<InlineData> {
    if image.data.is_empty() {
        return Err(RelayError::Validation("Image data is empty".to_string()));
    }
    let decoded = STANDARD
        .decode(image.data.as_bytes())
        .map_err(|e| RelayError::Validation(format!("Image data is not valid base64: {}", e)))?;

    attachment::validate(&image.mime_type, decoded.len() as u64)
        .map_err(|e| RelayError::Validation(e.to_string()))?;

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str, data: &str) -> InlineData {
        InlineData {
            mime_type: mime.to_string(),
            data: data.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_message_rejected_before_key_check() {
        let err = relay(None, RelayRequest::default()).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingInput));
    }

    #[tokio::test]
    async fn test_whitespace_message_rejected() {
        let request = RelayRequest {
            message: " \n\t ".to_string(),
            image: None,
        };
        let err = relay(None, request).await.unwrap_err();
        assert!(matches!(err, RelayError::MissingInput));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let request = RelayRequest {
            message: "Hello".to_string(),
            image: None,
        };
        let err = relay(None, request).await.unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[test]
    fn test_validate_image_accepts_png() {
        assert!(validate_image(image("image/png", "AQID")).is_ok());
    }

    #[test]
    fn test_validate_image_rejects_non_image() {
        let err = validate_image(image("application/pdf", "AQID")).unwrap_err();
        assert_eq!(err.to_string(), "Please select an image file");
    }

    #[test]
    fn test_validate_image_rejects_bad_base64() {
        let err = validate_image(image("image/png", "not base64!")).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn test_validate_image_rejects_empty_data() {
        let err = validate_image(image("image/png", "")).unwrap_err();
        assert_eq!(err.to_string(), "Image data is empty");
    }

    #[test]
    fn test_validate_image_rejects_oversized() {
        let bytes = vec![0u8; attachment::MAX_ATTACHMENT_BYTES as usize + 1];
        let err = validate_image(image("image/jpeg", &STANDARD.encode(bytes))).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 20MB");
    }

    #[test]
    fn test_state_from_config_without_key() {
        let state = RelayState::from_config(&RelayConfig::default());
        assert!(state.gemini.is_none());
    }

    #[test]
    fn test_state_from_config_with_key() {
        let config = RelayConfig {
            api_key: Some("k".to_string()),
            static_dir: Some(PathBuf::from("public")),
            ..Default::default()
        };
        let state = RelayState::from_config(&config);
        assert!(state.gemini.is_some());
        assert_eq!(state.static_dir, Some(PathBuf::from("public")));
    }
}
