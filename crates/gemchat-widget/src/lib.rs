// crates/gemchat-widget/src/lib.rs
// gemchat widget - client side of the chat exchange, independent of any UI toolkit

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod attachment;
pub mod composer;
pub mod controller;
pub mod error;
pub mod transcript;
pub mod transport;

pub use attachment::{AttachmentFile, MAX_ATTACHMENT_BYTES, PendingAttachment};
pub use controller::{ChatWidget, DEFAULT_IMAGE_PROMPT, PendingSend, SendOutcome, SendReport};
pub use error::{AttachmentError, ComposeError, ExchangeError};
pub use transcript::{Entry, EntryId, EntryKind, Transcript, TranscriptEvent};
pub use transport::{ExchangeTransport, RelayClient};
