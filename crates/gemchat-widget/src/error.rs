// crates/gemchat-widget/src/error.rs
// Error types for the chat widget

use thiserror::Error;

/// Rejected attachment. Shown inline as the widget notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Please select an image file")]
    NotAnImage { mime_type: String },

    #[error("File size must be less than 20MB")]
    TooLarge { size: u64 },
}

/// Failed exchange. Rendered as a bot-authored error entry, never propagated.
///
/// `Display` is the bare message so it can be interpolated into the bubble.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Non-success status from the relay (or the API behind it)
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Success status but no usable reply
    #[error("{0}")]
    Protocol(String),

    /// Request never completed (connect, timeout, body read)
    #[error("{0}")]
    Transport(String),
}

impl ExchangeError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ExchangeError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport(err.to_string())
    }
}

/// Send refused before anything was rendered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("nothing to send: message is empty and no image is attached")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_error_messages() {
        let err = AttachmentError::NotAnImage {
            mime_type: "text/plain".to_string(),
        };
        assert_eq!(err.to_string(), "Please select an image file");

        let err = AttachmentError::TooLarge { size: 25 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File size must be less than 20MB");
    }

    #[test]
    fn test_exchange_error_display_is_bare_message() {
        let err = ExchangeError::Upstream {
            status: 503,
            message: "model overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "model overloaded");
        assert_eq!(err.status(), Some(503));

        let err = ExchangeError::Protocol("No response from Gemini".to_string());
        assert_eq!(err.to_string(), "No response from Gemini");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_compose_error() {
        assert!(ComposeError::Empty.to_string().contains("nothing to send"));
    }
}
