//! Text buffer and caret state.
//!
//! [`BufferState`] is the single source of truth the engine reads and
//! produces. Offsets are UTF-8 byte offsets; a caret that falls inside a
//! multi-byte character is clamped down to the previous character boundary
//! instead of panicking.

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Text plus caret position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BufferState {
    text: String,
    caret: usize,
}

impl BufferState {
    /// Creates a buffer, clamping the caret into the text
    pub fn new(text: impl Into<String>, caret: usize) -> Self {
        let text = text.into();
        let caret = floor_char_boundary(&text, caret);
        Self { text, caret }
    }

    /// Creates a buffer with the caret at the end of the text
    pub fn at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.len();
        Self { text, caret }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Text from the start of the buffer up to the caret
    pub fn before_caret(&self) -> &str {
        &self.text[..self.caret]
    }

    /// Text from the caret to the end of the buffer
    pub fn after_caret(&self) -> &str {
        &self.text[self.caret..]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Moves the caret, clamping it into the text
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = floor_char_boundary(&self.text, caret);
    }

    /// Hash of text and caret, used to detect matches computed against an
    /// older buffer
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.text.hash(&mut hasher);
        self.caret.hash(&mut hasher);
        hasher.finish()
    }

    pub fn into_parts(self) -> (String, usize) {
        (self.text, self.caret)
    }
}

/// Largest char boundary in `text` that is `<= offset`
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    let mut offset = offset;
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
