// crates/gemchat-widget/src/attachment.rs
// Image attachment validation and data URL encoding

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use gemchat_types::InlineData;

use crate::error::AttachmentError;

/// Largest accepted attachment (20 MiB, inclusive)
pub const MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

/// A file picked by the user, before validation
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub name: String,
    /// MIME type reported by the picker; guessed from `name` when absent
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AttachmentFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reported MIME type, or a guess from the file extension
    pub fn resolved_mime_type(&self) -> String {
        match self.mime_type.as_deref().filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => mime_guess::from_path(&self.name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }
}

/// A validated, encoded attachment waiting for the next send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub data_url: String,
}

impl PendingAttachment {
    /// Validate type and size, then encode.
    pub fn from_file(file: &AttachmentFile) -> Result<Self, AttachmentError> {
        let mime_type = file.resolved_mime_type();
        validate(&mime_type, file.size())?;

        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(&file.bytes));

        Ok(Self {
            file_name: file.name.clone(),
            mime_type,
            size: file.size(),
            data_url,
        })
    }

    /// The inline data part carried by the outgoing request
    pub fn inline_data(&self) -> Option<InlineData> {
        InlineData::from_data_url(&self.data_url)
    }
}

/// Type must be `image/*`; size must not exceed [`MAX_ATTACHMENT_BYTES`].
pub fn validate(mime_type: &str, size: u64) -> Result<(), AttachmentError> {
    if !mime_type.starts_with("image/") {
        return Err(AttachmentError::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }
    Ok(())
}
