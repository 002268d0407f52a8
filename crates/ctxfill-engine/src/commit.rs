//! Buffer rewriting when a candidate is committed.
//!
//! The matched trigger and partial text are replaced by
//! `trigger + candidate` followed by one of:
//!
//! - the path separator, when the chosen node has children (the placeholder
//!   stays open for further drill-down);
//! - the call suffix and the closing delimiter, for callable leaves;
//! - the closing delimiter, for every other leaf or an unresolved candidate.
//!
//! A closing delimiter is never duplicated: if the text after the match
//! already starts with it, the existing one is reused and the caret moves
//! past it.

use ctxfill_core::{BufferState, CompletionError, EngineConfig, Result};

use crate::resolver::ResolvedNode;
use crate::scanner::TriggerMatch;
use crate::trigger_set::TriggerSet;

/// How the committed placeholder ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closing {
    /// Separator appended, more segments can follow
    Open,
    /// Closing delimiter appended
    Closed,
    /// Call suffix and closing delimiter appended
    Called,
}

/// Result of planning a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    /// The rewritten buffer
    pub buffer: BufferState,
    /// Text inserted in place of the match
    pub inserted: String,
    pub closing: Closing,
    /// An existing closing delimiter after the match was reused
    pub reused_closing: bool,
}

impl CommitPlan {
    pub fn is_open(&self) -> bool {
        self.closing == Closing::Open
    }
}

/// Computes spliced buffers for committed candidates
#[derive(Debug, Clone)]
pub struct CommitPlanner {
    separator: char,
    closing_delimiter: String,
    call_suffix: String,
    spacer: String,
}

impl CommitPlanner {
    pub fn new(
        separator: char,
        closing_delimiter: impl Into<String>,
        call_suffix: impl Into<String>,
    ) -> Self {
        Self {
            separator,
            closing_delimiter: closing_delimiter.into(),
            call_suffix: call_suffix.into(),
            spacer: String::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.path_separator(),
            config.closing_delimiter(),
            config.call_suffix(),
        )
        .with_spacer(config.spacer())
    }

    /// Text appended after a closed placeholder
    pub fn with_spacer(mut self, spacer: impl Into<String>) -> Self {
        self.spacer = spacer.into();
        self
    }

    /// Plan the commit of `candidate` for the match `found`.
    ///
    /// `resolved` is the node the candidate addresses (if any). Fails with
    /// `StaleCommit` when `found` was not scanned from `buffer`.
    pub fn plan(
        &self,
        buffer: &BufferState,
        found: &TriggerMatch,
        candidate: &str,
        resolved: Option<&ResolvedNode<'_>>,
        triggers: &TriggerSet,
    ) -> Result<CommitPlan> {
        let text = buffer.text();
        let match_end = found.match_start + found.match_length;
        if !found.is_current(buffer)
            || match_end > text.len()
            || found.trigger_start > found.match_start
        {
            tracing::debug!(
                caret = buffer.caret(),
                scanned_caret = found.caret,
                "Rejecting commit against outdated match"
            );
            return Err(CompletionError::StaleCommit);
        }

        let before = &text[..found.trigger_start];
        let after = text[match_end..].trim_end();

        let mut inserted = format!("{}{}", found.trigger, candidate);
        let open_path = format!("{}{}", inserted, self.separator);

        let has_children = resolved.is_some_and(|node| !node.is_terminal());
        let closing = if has_children || triggers.contains(&open_path) {
            Closing::Open
        } else if resolved.is_some_and(|node| node.is_callable()) {
            Closing::Called
        } else {
            Closing::Closed
        };

        // Caret lands after `inserted` plus whatever existing text it skips
        let mut skipped = 0;
        let mut reused_closing = false;

        match closing {
            Closing::Open => inserted.push(self.separator),
            Closing::Called => {
                let tail = format!("{}{}", self.call_suffix, self.closing_delimiter);
                if after.starts_with(&tail) {
                    skipped = tail.len();
                    reused_closing = true;
                } else if self.reuses_closing(after) {
                    inserted.push_str(&self.call_suffix);
                    skipped = self.closing_delimiter.len();
                    reused_closing = true;
                } else {
                    inserted.push_str(&tail);
                    inserted.push_str(&self.spacer);
                }
            }
            Closing::Closed => {
                if self.reuses_closing(after) {
                    skipped = self.closing_delimiter.len();
                    reused_closing = true;
                } else {
                    inserted.push_str(&self.closing_delimiter);
                    inserted.push_str(&self.spacer);
                }
            }
        }

        let caret = before.len() + inserted.len() + skipped;
        let new_text = format!("{}{}{}", before, inserted, after);

        tracing::debug!(
            candidate = %candidate,
            closing = ?closing,
            reused_closing,
            caret,
            "Planned commit"
        );

        Ok(CommitPlan {
            buffer: BufferState::new(new_text, caret),
            inserted,
            closing,
            reused_closing,
        })
    }

    /// Like [`plan`](Self::plan), but returns the buffer unchanged when the
    /// commit is rejected
    pub fn commit(
        &self,
        buffer: &BufferState,
        found: &TriggerMatch,
        candidate: &str,
        resolved: Option<&ResolvedNode<'_>>,
        triggers: &TriggerSet,
    ) -> BufferState {
        match self.plan(buffer, found, candidate, resolved, triggers) {
            Ok(plan) => plan.buffer,
            Err(err) => {
                tracing::debug!(error = %err, "Commit was a no-op");
                buffer.clone()
            }
        }
    }

    fn reuses_closing(&self, after: &str) -> bool {
        !self.closing_delimiter.is_empty() && after.starts_with(&self.closing_delimiter)
    }
}
