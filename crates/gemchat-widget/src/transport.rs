// crates/gemchat-widget/src/transport.rs
// Exchange transport: how a send reaches the relay

use async_trait::async_trait;
use gemchat_types::{RelayRequest, RelayResponse};
use tracing::debug;

use crate::error::ExchangeError;

/// Relay route, relative to the relay base URL
pub const CHAT_PATH: &str = "/api/chat";

/// Message used when a success response carries no reply
pub const NO_RESPONSE: &str = "No response from Gemini";

/// One request, one reply. Implementations must not retry.
#[async_trait]
pub trait ExchangeTransport: Send + Sync {
    async fn exchange(&self, request: RelayRequest) -> Result<String, ExchangeError>;
}

/// HTTP transport to a gemchat relay
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    /// `base_url` is the relay origin, e.g. `http://localhost:3000`
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ExchangeTransport for RelayClient {
    async fn exchange(&self, request: RelayRequest) -> Result<String, ExchangeError> {
        debug!(
            endpoint = %self.endpoint,
            has_image = request.image.is_some(),
            "Sending relay request"
        );

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        interpret_response(status.as_u16(), &body)
    }
}

/// Map a relay status and body to the reply text or an error.
pub fn interpret_response(status: u16, body: &str) -> Result<String, ExchangeError> {
    let parsed = serde_json::from_str::<RelayResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("API error: {}", status));
        return Err(ExchangeError::Upstream { status, message });
    }

    let parsed = parsed.map_err(|e| ExchangeError::Protocol(format!("Invalid response body: {}", e)))?;
    parsed
        .reply
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ExchangeError::Protocol(NO_RESPONSE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            RelayClient::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/chat"
        );
        assert_eq!(
            RelayClient::new("http://relay.internal").endpoint(),
            "http://relay.internal/api/chat"
        );
    }

    #[test]
    fn test_interpret_success() {
        assert_eq!(
            interpret_response(200, r#"{"reply": "Hi!"}"#).unwrap(),
            "Hi!"
        );
    }

    #[test]
    fn test_interpret_success_without_reply_is_protocol_error() {
        for body in [r#"{}"#, r#"{"reply": ""}"#, r#"{"reply": null}"#] {
            assert_eq!(
                interpret_response(200, body),
                Err(ExchangeError::Protocol(NO_RESPONSE.to_string()))
            );
        }
    }

    #[test]
    fn test_interpret_success_with_garbage_body() {
        let err = interpret_response(200, "<html>").unwrap_err();
        assert!(matches!(err, ExchangeError::Protocol(_)));
    }

    #[test]
    fn test_interpret_error_uses_relay_message() {
        let err = interpret_response(400, r#"{"error": "Message is required"}"#).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Upstream {
                status: 400,
                message: "Message is required".to_string()
            }
        );
    }

    #[test]
    fn test_interpret_error_without_message() {
        let err = interpret_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(err.to_string(), "API error: 502");
        assert_eq!(err.status(), Some(502));
    }
}
