// crates/gemchat-widget/src/transcript.rs
// Ordered transcript model with change events for a rendering surface

use gemchat_types::{ChatMessage, Role};
use serde::Serialize;
use tokio::sync::broadcast;

/// Capacity of the transcript event channel
const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// What the user sent (image, text, or both)
    User { message: ChatMessage },
    /// Staged attachment with a removal affordance
    AttachmentPreview { file_name: String, data_url: String },
    /// Transient placeholder while an exchange is in flight
    Thinking,
    Bot { text: String },
    Error { text: String },
}

impl EntryKind {
    pub fn role(&self) -> Role {
        match self {
            EntryKind::User { .. } | EntryKind::AttachmentPreview { .. } => Role::User,
            EntryKind::Thinking | EntryKind::Bot { .. } | EntryKind::Error { .. } => Role::Bot,
        }
    }

    /// Style classes for a DOM rendering of this entry
    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            EntryKind::User { .. } => &["message", "user-message"],
            EntryKind::AttachmentPreview { .. } => {
                &["message", "user-message", "image-preview-message"]
            }
            EntryKind::Thinking => &["message", "bot-message", "thinking"],
            EntryKind::Bot { .. } => &["message", "bot-message"],
            EntryKind::Error { .. } => &["message", "bot-message", "error"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(flatten)]
    pub kind: EntryKind,
}

/// Change notifications, in the order they were applied
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    Appended(Entry),
    Removed(EntryId),
    ScrolledTo(EntryId),
}

/// Append-only view of the conversation, minus removed entries.
///
/// Every append scrolls to the new entry.
#[derive(Debug)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
    scrolled_to: Option<EntryId>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: Vec::new(),
            next_id: 1,
            scrolled_to: None,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }

    pub fn append(&mut self, kind: EntryKind) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let entry = Entry { id, kind };
        self.entries.push(entry.clone());
        self.emit(TranscriptEvent::Appended(entry));
        self.scroll_to_bottom();
        id
    }

    /// Remove an entry; returns false if it was already gone.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entries.remove(pos);
        self.emit(TranscriptEvent::Removed(id));
        true
    }

    pub fn scroll_to_bottom(&mut self) {
        if let Some(last) = self.entries.last() {
            let id = last.id;
            self.scrolled_to = Some(id);
            self.emit(TranscriptEvent::ScrolledTo(id));
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn scrolled_to(&self) -> Option<EntryId> {
        self.scrolled_to
    }

    fn emit(&self, event: TranscriptEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
