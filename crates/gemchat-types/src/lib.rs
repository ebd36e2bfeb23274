// crates/gemchat-types/src/lib.rs
// Shared types for gemchat (native + WASM compatible)
// No native-only dependencies allowed here

use serde::{Deserialize, Deserializer, Serialize};

/// MIME type assumed when a data URL does not carry one
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

// ═══════════════════════════════════════
// CHAT DOMAIN
// ═══════════════════════════════════════

/// Author of a transcript message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// A rendered chat message. Lives only as long as the transcript does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineData>,
}

impl ChatMessage {
    pub fn user(text: Option<String>, image: Option<InlineData>) -> Self {
        Self {
            role: Role::User,
            text,
            image,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: Some(text.into()),
            image: None,
        }
    }
}

/// Base64 payload with its MIME type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineData {
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    /// Split a `data:<mime>;base64,<payload>` URL into its parts.
    ///
    /// A URL without a MIME type falls back to `image/jpeg`. Returns `None`
    /// when there is no payload separator.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let (header, payload) = url.split_once(',')?;
        let mime_type = header
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_IMAGE_MIME);

        Some(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

// ═══════════════════════════════════════
// GEMINI WIRE FORMAT
// ═══════════════════════════════════════

/// One fragment of a `generateContent` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(alias = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(data: InlineData) -> Self {
        Part::InlineData { inline_data: data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Sampling parameters sent with relay requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn request: image part (if any) first, then text
    pub fn single_turn(text: Option<&str>, image: Option<InlineData>) -> Self {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(Part::inline(image));
        }
        if let Some(text) = text {
            parts.push(Part::text(text));
        }

        Self {
            contents: vec![Content { parts }],
            generation_config: None,
        }
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// Response part; only the text field matters to the exchange
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

/// Error envelope returned by the generative API on failure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiErrorEnvelope {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()?
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
    }
}

// ═══════════════════════════════════════
// RELAY API
// ═══════════════════════════════════════

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelayRequest {
    /// Missing and `null` both read as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineData>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Successful relay response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayReply {
    pub reply: String,
}

/// Error relay response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayErrorBody {
    pub error: String,
}

/// Either relay envelope, as seen by a client that has not checked the status yet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // InlineData tests
    // ============================================================================

    #[test]
    fn test_from_data_url() {
        let data = InlineData::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(data.mime_type, "image/png");
        assert_eq!(data.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_from_data_url_without_mime() {
        let data = InlineData::from_data_url("data:;base64,AAAA").unwrap();
        assert_eq!(data.mime_type, FALLBACK_IMAGE_MIME);
    }

    #[test]
    fn test_from_data_url_without_separator() {
        assert!(InlineData::from_data_url("data:image/png;base64").is_none());
    }

    #[test]
    fn test_data_url_round_trip_text() {
        let data = InlineData {
            mime_type: "image/gif".to_string(),
            data: "R0lGOD".to_string(),
        };
        assert_eq!(data.to_data_url(), "data:image/gif;base64,R0lGOD");
    }

    #[test]
    fn test_inline_data_accepts_camel_case() {
        let json = r#"{"mimeType": "image/webp", "data": "UklGR"}"#;
        let data: InlineData = serde_json::from_str(json).unwrap();
        assert_eq!(data.mime_type, "image/webp");
    }

    // ============================================================================
    // Request shape tests
    // ============================================================================

    #[test]
    fn test_single_turn_text_only() {
        let req = GenerateContentRequest::single_turn(Some("Hello"), None);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "Hello"}]}]})
        );
    }

    #[test]
    fn test_single_turn_image_precedes_text() {
        let image = InlineData {
            mime_type: "image/png".to_string(),
            data: "abc".to_string(),
        };
        let req = GenerateContentRequest::single_turn(Some("What is this?"), Some(image));
        let json = serde_json::to_value(&req).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[0]["inline_data"]["data"], "abc");
        assert_eq!(parts[1]["text"], "What is this?");
    }

    #[test]
    fn test_generation_config_camel_case() {
        let req = GenerateContentRequest::single_turn(Some("hi"), None).with_generation_config(
            GenerationConfig {
                max_output_tokens: 1000,
                temperature: 0.5,
                top_p: 0.8,
                top_k: 40,
            },
        );
        let json = serde_json::to_value(&req).unwrap();
        let config = &json["generationConfig"];
        assert_eq!(config["maxOutputTokens"], 1000);
        assert_eq!(config["temperature"], 0.5);
        assert_eq!(config["topK"], 40);
        assert!(config.get("topP").is_some());
    }

    // ============================================================================
    // Response parsing tests
    // ============================================================================

    #[test]
    fn test_first_text() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hi there"}, {"text": "ignored"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some("Hi there"));
    }

    #[test]
    fn test_first_text_missing_paths() {
        for json in [
            r#"{}"#,
            r#"{"candidates": []}"#,
            r#"{"candidates": [{}]}"#,
            r#"{"candidates": [{"content": {"parts": []}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"functionCall": {"name": "x"}}]}}]}"#,
            r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#,
        ] {
            let resp: GenerateContentResponse = serde_json::from_str(json).unwrap();
            assert_eq!(resp.first_text(), None, "expected no text for {}", json);
        }
    }

    #[test]
    fn test_api_error_message() {
        let json = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let env: ApiErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(env.message(), Some("API key not valid"));

        let empty: ApiErrorEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.message(), None);
    }

    // ============================================================================
    // Relay envelope tests
    // ============================================================================

    #[test]
    fn test_relay_request_missing_message_defaults_empty() {
        let req: RelayRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");
        assert!(req.image.is_none());
    }

    #[test]
    fn test_relay_request_skips_absent_image() {
        let req = RelayRequest {
            message: "Hello".to_string(),
            image: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"Hello"}"#);
    }

    #[test]
    fn test_relay_response_either_shape() {
        let ok: RelayResponse = serde_json::from_str(r#"{"reply": "hey"}"#).unwrap();
        assert_eq!(ok.reply.as_deref(), Some("hey"));
        assert!(ok.error.is_none());

        let err: RelayResponse = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert!(err.reply.is_none());
        assert_eq!(err.error.as_deref(), Some("nope"));
    }

    #[test]
    fn test_chat_message_role_serialization() {
        let msg = ChatMessage::bot("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"bot\""));
        assert!(!json.contains("image"));
    }

    #[test]
    fn test_relay_request_null_or_missing_message_is_empty() {
        let missing: RelayRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.message, "");

        let null: RelayRequest = serde_json::from_str(r#"{"message": null}"#).unwrap();
        assert_eq!(null.message, "");

        let wrong_type = serde_json::from_str::<RelayRequest>(r#"{"message": 5}"#);
        assert!(wrong_type.is_err());
    }
}
