//! Backward trigger scanning over a raw text buffer.
//!
//! Starting at the caret, the scanner walks back one character at a time over
//! text that still forms a valid slug. At each position `i` it asks whether
//! `text[..i]` ends with one of the configured triggers; the first hit wins,
//! and among triggers ending at the same position the longest wins. The text
//! between the trigger and the caret is the partially typed candidate.
//!
//! The empty trigger `""` is a catch-all: when no literal trigger is found it
//! matches the run of slug characters immediately before the caret.

use ctxfill_core::{BufferState, EngineConfig, Result};
use regex::Regex;
use std::ops::Range;

/// Matching options for trigger detection and candidate filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Whether partial text may match anywhere in a candidate.
    pub match_any: bool,
    /// Whether a trigger must not be preceded by a word character.
    pub whole_word: bool,
    /// Whether comparisons ignore case.
    pub case_insensitive: bool,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn match_any(mut self, value: bool) -> Self {
        self.match_any = value;
        self
    }

    pub fn whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }
}

impl From<&EngineConfig> for ScanOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            match_any: config.match_any(),
            whole_word: config.whole_word(),
            case_insensitive: config.case_insensitive(),
        }
    }
}

/// An active trigger found before the caret.
///
/// Ephemeral: it is only valid for the exact buffer it was scanned from,
/// which is recorded in `fingerprint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// The configured trigger literal (canonical spelling, even when the
    /// buffer matched it case-insensitively)
    pub trigger: String,
    /// Byte offset where the trigger starts
    pub trigger_start: usize,
    /// Byte offset where the partial text starts (end of the trigger)
    pub match_start: usize,
    /// Length in bytes of the partial text
    pub match_length: usize,
    /// Caret the scan started from
    pub caret: usize,
    /// Fingerprint of the scanned buffer
    pub fingerprint: u64,
    /// Partially typed text after the trigger
    pub partial: String,
}

impl TriggerMatch {
    /// Byte range of trigger plus partial text
    pub fn range(&self) -> Range<usize> {
        self.trigger_start..self.match_start + self.match_length
    }

    /// Byte range of the partial text
    pub fn partial_range(&self) -> Range<usize> {
        self.match_start..self.match_start + self.match_length
    }

    /// Whether this match was computed against `buffer`
    pub fn is_current(&self, buffer: &BufferState) -> bool {
        self.fingerprint == buffer.fingerprint()
    }
}

/// Finds the active trigger before a caret.
#[derive(Debug, Clone)]
pub struct TriggerScanner {
    slug: Regex,
    options: ScanOptions,
}

impl TriggerScanner {
    pub fn new(slug: Regex, options: ScanOptions) -> Self {
        Self { slug, options }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.slug_regex()?, ScanOptions::from(config)))
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Scan backward from the caret for the most specific active trigger.
    ///
    /// Returns `None` when no trigger is active; this is the normal "hide
    /// suggestions" signal, not an error.
    pub fn scan<S: AsRef<str>>(&self, buffer: &BufferState, triggers: &[S]) -> Option<TriggerMatch> {
        let caret = buffer.caret();
        let before = buffer.before_caret();

        let mut literals: Vec<&str> = triggers
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !t.is_empty())
            .collect();
        // Longest first so the most specific trigger wins at a given position
        literals.sort_by(|a, b| b.len().cmp(&a.len()));
        let catch_all = triggers.iter().any(|t| t.as_ref().is_empty());

        tracing::trace!(caret, triggers = literals.len(), catch_all, "Scanning for trigger");

        let mut i = caret;
        loop {
            let partial = &before[i..];
            if !partial.is_empty() && !self.slug.is_match(partial) {
                break;
            }

            if let Some(trigger) = literals
                .iter()
                .find(|t| self.trigger_ends_at(before, i, t))
            {
                let found = self.build_match(buffer, trigger, i - trigger.len(), i);
                tracing::trace!(trigger = %found.trigger, partial = %found.partial, "Trigger found");
                return Some(found);
            }

            match before[..i].chars().next_back() {
                Some(ch) => i -= ch.len_utf8(),
                None => break,
            }
        }

        if catch_all {
            return self.scan_catch_all(buffer);
        }

        None
    }

    /// Whether `before[..end]` ends with `trigger`, honoring case and
    /// whole-word options
    fn trigger_ends_at(&self, before: &str, end: usize, trigger: &str) -> bool {
        if end < trigger.len() {
            return false;
        }
        let start = end - trigger.len();
        if !before.is_char_boundary(start) {
            return false;
        }

        let slice = &before[start..end];
        let equal = if self.options.case_insensitive {
            slice.to_lowercase() == trigger.to_lowercase()
        } else {
            slice == trigger
        };
        if !equal {
            return false;
        }

        if self.options.whole_word {
            if let Some(prev) = before[..start].chars().next_back() {
                if is_word_char(prev) {
                    return false;
                }
            }
        }

        true
    }

    /// The empty trigger matches the longest non-empty slug ending at the caret
    fn scan_catch_all(&self, buffer: &BufferState) -> Option<TriggerMatch> {
        let before = buffer.before_caret();
        let mut start = before.len();

        for (idx, _) in before.char_indices().rev() {
            if self.slug.is_match(&before[idx..]) {
                start = idx;
            } else {
                break;
            }
        }

        if start == before.len() {
            // Nothing typed since the last boundary
            return None;
        }

        Some(self.build_match(buffer, "", start, start))
    }

    fn build_match(
        &self,
        buffer: &BufferState,
        trigger: &str,
        trigger_start: usize,
        match_start: usize,
    ) -> TriggerMatch {
        let caret = buffer.caret();
        TriggerMatch {
            trigger: trigger.to_string(),
            trigger_start,
            match_start,
            match_length: caret - match_start,
            caret,
            fingerprint: buffer.fingerprint(),
            partial: buffer.text()[match_start..caret].to_string(),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
