//! Detection of completed placeholders for emphasized rendering.
//!
//! A completed placeholder is any trigger followed by word/dot characters,
//! an optional call suffix and the closing delimiter, e.g.
//! `{{context.customer.name}}` or `{{context.location.get()}}`.

use ctxfill_core::{CompletionError, EngineConfig, Result};
use regex::Regex;
use std::ops::Range;

use crate::trigger_set::TriggerSet;

/// A completed placeholder in the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpan {
    /// Byte range of the whole placeholder, delimiters included
    pub range: Range<usize>,
    /// Whether the placeholder ends with the call suffix
    pub callable: bool,
}

impl PlaceholderSpan {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

/// Finds completed placeholders
#[derive(Debug, Clone)]
pub struct PlaceholderHighlighter {
    regex: Regex,
}

impl PlaceholderHighlighter {
    /// Compile a highlighter from a trigger set
    pub fn new(triggers: &TriggerSet, config: &EngineConfig) -> Result<Self> {
        let mut alternatives: Vec<&str> = triggers.scan_triggers();
        // Longest first so the alternation prefers the most specific trigger
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternation = alternatives
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            r"(?:{})[\w.]+(?P<call>{})?{}",
            alternation,
            regex::escape(config.call_suffix()),
            regex::escape(config.closing_delimiter()),
        );

        let regex = Regex::new(&pattern).map_err(|e| {
            CompletionError::InvalidConfig(format!("placeholder pattern: {}", e))
        })?;

        Ok(Self { regex })
    }

    /// All completed placeholders in `text`, in order
    pub fn spans(&self, text: &str) -> Vec<PlaceholderSpan> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(PlaceholderSpan {
                    range: whole.start()..whole.end(),
                    callable: caps.name("call").is_some(),
                })
            })
            .collect()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
