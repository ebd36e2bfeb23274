// crates/gemchat-server/src/error.rs
// Relay error taxonomy and its HTTP mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gemchat_types::RelayErrorBody;
use thiserror::Error;

/// Shown when the relay runs without a Gemini credential
pub const MISSING_API_KEY: &str = "API key not configured. Please set GEMINI_API_KEY in .env file";

/// Every way a relay call can fail. `Display` is the text put in `{"error": ...}`.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Empty or whitespace-only message
    #[error("Message is required")]
    MissingInput,

    /// Body was not the expected JSON
    #[error("{0}")]
    InvalidBody(String),

    /// Attached image failed validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    /// Non-success status from the generative API, passed through
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Success status but no text at candidates[0].content.parts[0].text
    #[error("Unexpected response format from API")]
    Protocol,

    #[error("{0}")]
    Unexpected(String),
}

/// Convenience type alias for Result using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn missing_api_key() -> Self {
        RelayError::Configuration(MISSING_API_KEY.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingInput | RelayError::InvalidBody(_) | RelayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RelayError::Configuration(_) | RelayError::Protocol | RelayError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        // the request URL carries the API key as a query parameter
        RelayError::Unexpected(err.without_url().to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = RelayErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
