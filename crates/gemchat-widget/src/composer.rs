// crates/gemchat-widget/src/composer.rs
// Message input state: text, selection, and emoji picker visibility

use std::ops::Range;

/// The message input box.
///
/// Offsets are in characters, not bytes. A `None` selection means the
/// cursor sits at the end of the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
    selection: Option<Range<usize>>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole input; the cursor moves to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = None;
    }

    /// Select `start..end`, clamped to the text and normalized so start <= end.
    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let (a, b) = (start.min(len), end.min(len));
        self.selection = Some(a.min(b)..a.max(b));
    }

    pub fn selection(&self) -> Range<usize> {
        let len = self.char_len();
        match &self.selection {
            Some(r) => r.start.min(len)..r.end.min(len),
            None => len..len,
        }
    }

    pub fn cursor(&self) -> usize {
        self.selection().end
    }

    /// Replace the selection with `insert` and place the cursor after it.
    pub fn insert_at_cursor(&mut self, insert: &str) {
        let range = self.selection();
        let start = self.byte_offset(range.start);
        let end = self.byte_offset(range.end);
        self.text.replace_range(start..end, insert);

        let cursor = range.start + insert.chars().count();
        self.selection = Some(cursor..cursor);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.selection = None;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// Emoji picker visibility. Selecting an emoji keeps the picker open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmojiPicker {
    visible: bool,
}

impl EmojiPicker {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Handle a click somewhere in the page. Clicks on the picker or its
    /// button leave it alone; anything else closes it.
    pub fn dismiss_on_click(&mut self, inside_picker: bool) -> bool {
        if self.visible && !inside_picker {
            self.visible = false;
            return true;
        }
        false
    }
}
