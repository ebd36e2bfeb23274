// crates/gemchat-widget/src/controller.rs
// Chat widget controller - owns transcript, composer and staged attachment
//
// Per-send lifecycle:
//   Idle -> UserMessageRendered -> Awaiting(thinking shown) -> Resolved | Failed -> Idle
// The state lock is never held across the exchange, so sends overlap freely
// and each one owns its own thinking placeholder.

use std::sync::Arc;

use gemchat_types::{ChatMessage, RelayRequest};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, warn};

use crate::attachment::{AttachmentFile, PendingAttachment};
use crate::composer::{Composer, EmojiPicker};
use crate::error::{AttachmentError, ComposeError, ExchangeError};
use crate::transcript::{Entry, EntryId, EntryKind, Transcript, TranscriptEvent};
use crate::transport::ExchangeTransport;

/// Prompt sent when the user attaches an image without text
pub const DEFAULT_IMAGE_PROMPT: &str = "What is in this image?";

/// Prefix of every rendered exchange failure
pub const ERROR_PREFIX: &str = "Sorry, I encountered an error: ";

#[derive(Debug, Clone)]
struct StagedAttachment {
    attachment: PendingAttachment,
    preview: EntryId,
}

#[derive(Debug, Default)]
struct WidgetState {
    transcript: Transcript,
    composer: Composer,
    picker: EmojiPicker,
    staged: Option<StagedAttachment>,
    /// Name shown by the file input; cleared on rejection, removal and send
    file_input: Option<String>,
    /// Inline validation message from the last staging attempt
    notice: Option<String>,
}

impl WidgetState {
    fn clear_staged(&mut self) {
        if let Some(staged) = self.staged.take() {
            self.transcript.remove(staged.preview);
        }
        self.file_input = None;
    }
}

/// A send that has been rendered and is waiting for its exchange
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub user_entry: EntryId,
    pub placeholder: EntryId,
    pub request: RelayRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Resolved { entry: EntryId, reply: String },
    Failed { entry: EntryId, error: ExchangeError },
}

impl SendOutcome {
    pub fn entry(&self) -> EntryId {
        match self {
            SendOutcome::Resolved { entry, .. } | SendOutcome::Failed { entry, .. } => *entry,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, SendOutcome::Resolved { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendReport {
    pub user_entry: EntryId,
    pub placeholder: EntryId,
    pub outcome: SendOutcome,
}

/// The chat widget. Cheap to clone; clones share state.
pub struct ChatWidget<T> {
    transport: Arc<T>,
    state: Arc<Mutex<WidgetState>>,
}

impl<T> Clone for ChatWidget<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T: ExchangeTransport> ChatWidget<T> {
    pub fn new(transport: T) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<T>) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(WidgetState::default())),
        }
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.state.lock().await.transcript.subscribe()
    }

    pub async fn entries(&self) -> Vec<Entry> {
        self.state.lock().await.transcript.entries().to_vec()
    }

    pub async fn scrolled_to(&self) -> Option<EntryId> {
        self.state.lock().await.transcript.scrolled_to()
    }

    pub async fn notice(&self) -> Option<String> {
        self.state.lock().await.notice.clone()
    }

    pub async fn file_input(&self) -> Option<String> {
        self.state.lock().await.file_input.clone()
    }

    pub async fn staged_attachment(&self) -> Option<PendingAttachment> {
        self.state
            .lock()
            .await
            .staged
            .as_ref()
            .map(|s| s.attachment.clone())
    }

    // ═══════════════════════════════════════
    // ATTACHMENTS
    // ═══════════════════════════════════════

    /// Validate and stage an image, replacing any staged one.
    ///
    /// On rejection the reason becomes the inline notice, the file input is
    /// cleared and no preview is added. The error is also returned so a caller
    /// can react, but nothing needs to handle it.
    pub async fn stage_attachment(&self, file: AttachmentFile) -> Result<EntryId, AttachmentError> {
        let mut state = self.state.lock().await;
        state.file_input = Some(file.name.clone());

        match PendingAttachment::from_file(&file) {
            Ok(attachment) => {
                if let Some(old) = state.staged.take() {
                    state.transcript.remove(old.preview);
                }
                let preview = state.transcript.append(EntryKind::AttachmentPreview {
                    file_name: attachment.file_name.clone(),
                    data_url: attachment.data_url.clone(),
                });
                debug!(
                    file = %attachment.file_name,
                    mime_type = %attachment.mime_type,
                    size = attachment.size,
                    "Attachment staged"
                );
                state.staged = Some(StagedAttachment { attachment, preview });
                state.notice = None;
                Ok(preview)
            }
            Err(err) => {
                debug!(file = %file.name, error = %err, "Attachment rejected");
                state.file_input = None;
                state.notice = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Drop the staged attachment and its preview. Idempotent.
    pub async fn remove_attachment(&self) {
        self.state.lock().await.clear_staged();
    }

    // ═══════════════════════════════════════
    // COMPOSER
    // ═══════════════════════════════════════

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.lock().await.composer.set_text(text);
    }

    pub async fn input(&self) -> String {
        self.state.lock().await.composer.text().to_string()
    }

    pub async fn select_input(&self, start: usize, end: usize) {
        self.state.lock().await.composer.select(start, end);
    }

    /// Insert an emoji at the cursor. The picker stays open.
    pub async fn insert_emoji(&self, emoji: &str) {
        self.state.lock().await.composer.insert_at_cursor(emoji);
    }

    pub async fn toggle_picker(&self) -> bool {
        self.state.lock().await.picker.toggle()
    }

    pub async fn picker_visible(&self) -> bool {
        self.state.lock().await.picker.is_visible()
    }

    /// Page click handler; closes the picker when the click is outside it.
    pub async fn handle_click(&self, inside_picker: bool) {
        self.state.lock().await.picker.dismiss_on_click(inside_picker);
    }

    // ═══════════════════════════════════════
    // SENDING
    // ═══════════════════════════════════════

    /// Send whatever is in the composer.
    pub async fn submit(&self) -> Result<SendReport, ComposeError> {
        let text = self.state.lock().await.composer.text().to_string();
        self.send_message(&text).await
    }

    /// Render the user's message, run one exchange, render its outcome.
    pub async fn send_message(&self, text: &str) -> Result<SendReport, ComposeError> {
        let pending = self.begin_send(text).await?;
        Ok(self.complete_send(pending).await)
    }

    /// Run the exchange for a send started with [`ChatWidget::begin_send`]
    /// and render its outcome.
    pub async fn complete_send(&self, pending: PendingSend) -> SendReport {
        let result = self.transport.exchange(pending.request.clone()).await;
        self.finish_send(pending, result).await
    }

    /// First half of a send: consume inputs, render the user message and a
    /// thinking placeholder, and build the request.
    ///
    /// Fails with [`ComposeError::Empty`] when there is neither text nor an
    /// attachment; nothing is rendered in that case.
    pub async fn begin_send(&self, text: &str) -> Result<PendingSend, ComposeError> {
        let text = text.trim();
        let mut state = self.state.lock().await;

        if text.is_empty() && state.staged.is_none() {
            return Err(ComposeError::Empty);
        }

        let attachment = state.staged.as_ref().map(|s| s.attachment.clone());
        state.composer.clear();
        state.clear_staged();

        let image = attachment.as_ref().and_then(PendingAttachment::inline_data);
        let user_text = (!text.is_empty()).then(|| text.to_string());
        let user_entry = state.transcript.append(EntryKind::User {
            message: ChatMessage::user(user_text, image.clone()),
        });
        let placeholder = state.transcript.append(EntryKind::Thinking);

        let message = if text.is_empty() {
            DEFAULT_IMAGE_PROMPT.to_string()
        } else {
            text.to_string()
        };

        debug!(
            user_entry = user_entry.0,
            placeholder = placeholder.0,
            has_image = image.is_some(),
            "Exchange started"
        );

        Ok(PendingSend {
            user_entry,
            placeholder,
            request: RelayRequest { message, image },
        })
    }

    /// Second half of a send: drop the placeholder, then render the reply or
    /// the error.
    pub async fn finish_send(
        &self,
        pending: PendingSend,
        result: Result<String, ExchangeError>,
    ) -> SendReport {
        let mut state = self.state.lock().await;
        state.transcript.remove(pending.placeholder);

        let outcome = match result {
            Ok(reply) => {
                let entry = state.transcript.append(EntryKind::Bot {
                    text: reply.clone(),
                });
                SendOutcome::Resolved { entry, reply }
            }
            Err(error) => {
                warn!(placeholder = pending.placeholder.0, error = %error, "Exchange failed");
                let entry = state.transcript.append(EntryKind::Error {
                    text: format!("{}{}", ERROR_PREFIX, error),
                });
                SendOutcome::Failed { entry, error }
            }
        };

        SendReport {
            user_entry: pending.user_entry,
            placeholder: pending.placeholder,
            outcome,
        }
    }
}
