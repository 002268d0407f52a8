//! The completion session: one text buffer, one forest, one popup.
//!
//! The host reports edits and caret moves, forwards navigation keys, and
//! applies the buffers the session hands back. Everything runs on the
//! caller's thread; candidate requests are answered asynchronously by the
//! host and matched back by sequence number.

use ctxfill_core::{BufferState, CompletionError, EngineConfig, Result, SuggestionForest};
use std::sync::Arc;

use crate::candidates::{Candidate, filter_candidates};
use crate::commit::{CommitPlan, CommitPlanner};
use crate::highlight::{PlaceholderHighlighter, PlaceholderSpan};
use crate::navigation::{KeyAction, KeyBindings, NavigationKey, NavigationState};
use crate::resolver::ForestResolver;
use crate::scanner::{TriggerMatch, TriggerScanner};
use crate::trigger_set::{CacheStats, TriggerSet, TriggerSetBuilder, TriggerSetCache};

/// Ask the host for fresh suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRequest {
    pub sequence: u64,
    /// Trigger that is active
    pub trigger: String,
    /// Text typed after the trigger
    pub partial: String,
}

/// The host's answer to a [`CandidateRequest`]
#[derive(Debug, Clone)]
pub struct CandidateResponse {
    pub sequence: u64,
    pub forest: SuggestionForest,
}

/// Effects of an edit the host has to act on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub request: Option<CandidateRequest>,
    /// Replacement buffer, when the session rewrote the edit
    pub buffer: Option<BufferState>,
}

/// Effects of a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: KeyAction,
    /// The host must not apply the key's default behavior
    pub prevent_default: bool,
    /// New buffer after a commit
    pub buffer: Option<BufferState>,
    pub request: Option<CandidateRequest>,
}

#[derive(Debug)]
pub struct CompletionSession {
    config: EngineConfig,
    scanner: TriggerScanner,
    resolver: ForestResolver,
    planner: CommitPlanner,
    builder: TriggerSetBuilder,
    keys: KeyBindings,

    forest: Arc<SuggestionForest>,
    generation: u64,
    cache: TriggerSetCache,
    highlighter: PlaceholderHighlighter,

    buffer: BufferState,
    active: Option<TriggerMatch>,
    navigation: NavigationState,
    sequence: u64,
    /// A spacer was just appended; the next edit may swap it with a remover
    space_armed: bool,
}

impl CompletionSession {
    pub fn new(config: EngineConfig, forest: SuggestionForest) -> Result<Self> {
        config.validate()?;
        forest.check_depth(config.max_forest_depth())?;

        let builder = TriggerSetBuilder::from_config(&config);
        let mut cache = TriggerSetCache::new();
        let triggers = cache.get_or_build(0, &forest, &builder)?;
        let highlighter = PlaceholderHighlighter::new(&triggers, &config)?;

        tracing::debug!(
            triggers = triggers.len(),
            max_options = config.max_options(),
            "Created completion session"
        );

        Ok(Self {
            scanner: TriggerScanner::from_config(&config)?,
            resolver: ForestResolver::from_config(&config),
            planner: CommitPlanner::from_config(&config),
            keys: KeyBindings::from(&config),
            navigation: NavigationState::new(config.max_options()),
            builder,
            forest: Arc::new(forest),
            generation: 0,
            cache,
            highlighter,
            buffer: BufferState::default(),
            active: None,
            sequence: 0,
            space_armed: false,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn buffer(&self) -> &BufferState {
        &self.buffer
    }

    pub fn forest(&self) -> &Arc<SuggestionForest> {
        &self.forest
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// The trigger currently driving the popup
    pub fn active_match(&self) -> Option<&TriggerMatch> {
        self.active.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.navigation.is_visible()
    }

    pub fn visible_candidates(&self) -> &[Candidate] {
        self.navigation.visible_window()
    }

    /// Sequence number of the latest request issued
    pub fn latest_sequence(&self) -> u64 {
        self.sequence
    }

    pub fn trigger_set(&mut self) -> Result<Arc<TriggerSet>> {
        self.cache
            .get_or_build(self.generation, &self.forest, &self.builder)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Swap the forest. The popup state is reset and the buffer rescanned
    /// against the new forest without issuing a request.
    pub fn replace_forest(&mut self, forest: SuggestionForest) -> Result<()> {
        forest.check_depth(self.config.max_forest_depth())?;

        self.forest = Arc::new(forest);
        self.generation += 1;
        self.cache.invalidate();
        self.active = None;
        self.navigation.cancel();

        let triggers = self.trigger_set()?;
        self.highlighter = PlaceholderHighlighter::new(&triggers, &self.config)?;

        tracing::info!(
            generation = self.generation,
            triggers = triggers.len(),
            "Replaced suggestion forest"
        );

        self.refresh(false)?;
        Ok(())
    }

    /// The host changed the text
    pub fn on_edit(&mut self, text: impl Into<String>, caret: usize) -> Result<SessionUpdate> {
        let mut buffer = BufferState::new(text, caret);

        let rewritten = if std::mem::take(&mut self.space_armed) {
            self.remove_space(&buffer)
        } else {
            None
        };
        if let Some(swapped) = &rewritten {
            tracing::trace!(caret = swapped.caret(), "Swapped spacer with remover");
            buffer = swapped.clone();
        }

        self.buffer = buffer;
        let request = self.refresh(true)?;
        Ok(SessionUpdate {
            request,
            buffer: rewritten,
        })
    }

    /// The caret moved without an edit
    pub fn on_caret_move(&mut self, caret: usize) -> Result<Option<CandidateRequest>> {
        self.space_armed = false;
        self.buffer.set_caret(caret);
        self.refresh(true)
    }

    pub fn handle_key(&mut self, key: NavigationKey) -> Result<KeyOutcome> {
        let action = self.keys.action(key, self.navigation.is_visible());
        let mut buffer = None;
        let mut request = None;

        match action {
            KeyAction::SelectNext => self.navigation.cycle_down(),
            KeyAction::SelectPrevious => self.navigation.cycle_up(),
            KeyAction::Dismiss => self.cancel(),
            KeyAction::Commit => match self.commit_selected() {
                Ok((plan, next)) => {
                    buffer = Some(plan.buffer);
                    request = next;
                }
                Err(err) if err.is_recoverable() => {
                    tracing::debug!(error = %err, "Commit key ignored");
                }
                Err(err) => return Err(err),
            },
            KeyAction::PassThrough => {}
        }

        Ok(KeyOutcome {
            action,
            prevent_default: action.prevents_default(),
            buffer,
            request,
        })
    }

    /// Commit the candidate at `index` of the visible window
    pub fn commit_index(&mut self, index: usize) -> Result<(CommitPlan, Option<CandidateRequest>)> {
        if !self.navigation.select(index) {
            return Err(CompletionError::EmptyCandidateSelection {
                index,
                len: self.navigation.visible_window().len(),
            });
        }
        self.commit_selected()
    }

    /// Commit the highlighted candidate.
    ///
    /// Returns the plan and, when the placeholder stayed open, the request
    /// for the next level.
    pub fn commit_selected(&mut self) -> Result<(CommitPlan, Option<CandidateRequest>)> {
        let found = self.active.clone().ok_or(CompletionError::NoActiveTrigger)?;
        if !found.is_current(&self.buffer) {
            self.cancel();
            return Err(CompletionError::StaleCommit);
        }
        let candidate = self.navigation.commit()?;
        let triggers = self.trigger_set()?;

        let path = format!(
            "{}{}{}",
            found.trigger,
            candidate.name,
            self.config.path_separator()
        );
        let resolved = self.resolver.resolve(&path, &self.forest);
        let plan = self.planner.plan(
            &self.buffer,
            &found,
            &candidate.name,
            resolved.as_ref(),
            &triggers,
        )?;

        tracing::debug!(
            candidate = %candidate.name,
            open = plan.is_open(),
            "Committed candidate"
        );

        self.buffer = plan.buffer.clone();
        self.active = None;
        let request = self.refresh(true)?;
        self.space_armed =
            !plan.is_open() && !plan.reused_closing && !self.config.spacer().is_empty();

        Ok((plan, request))
    }

    /// Dismiss the popup
    pub fn cancel(&mut self) {
        self.active = None;
        self.navigation.cancel();
    }

    /// Apply a host response. Only the answer to the latest request is
    /// used; anything older is dropped and `false` returned.
    pub fn apply_response(&mut self, response: CandidateResponse) -> Result<bool> {
        if response.sequence != self.sequence {
            tracing::debug!(
                sequence = response.sequence,
                latest = self.sequence,
                "Discarding outdated candidate response"
            );
            return Ok(false);
        }
        self.replace_forest(response.forest)?;
        Ok(true)
    }

    /// Completed placeholders in the current buffer
    pub fn placeholder_spans(&self) -> Vec<PlaceholderSpan> {
        self.highlighter.spans(self.buffer.text())
    }

    /// Rescan the buffer and rebuild the candidate list
    fn refresh(&mut self, issue_request: bool) -> Result<Option<CandidateRequest>> {
        let triggers = self.trigger_set()?;

        let found = match self.scanner.scan(&self.buffer, &triggers.scan_triggers()) {
            Some(found) if found.partial.chars().count() >= self.config.min_chars() => found,
            _ => {
                self.cancel();
                return Ok(None);
            }
        };

        let level = self.resolver.level(&found.trigger, &self.forest);
        let candidates = filter_candidates(level.nodes, &found.partial, self.scanner.options());
        tracing::trace!(
            trigger = %found.trigger,
            partial = %found.partial,
            count = candidates.len(),
            "Refreshed candidates"
        );
        self.navigation.set_candidates(candidates);

        let request = issue_request.then(|| {
            self.sequence += 1;
            CandidateRequest {
                sequence: self.sequence,
                trigger: found.trigger.clone(),
                partial: found.partial.clone(),
            }
        });
        self.active = Some(found);
        Ok(request)
    }

    fn remove_space(&self, buffer: &BufferState) -> Option<BufferState> {
        let spacer = self.config.spacer();
        let before = buffer.before_caret();

        self.config.space_removers().iter().find_map(|remover| {
            let typed = format!("{}{}", spacer, remover);
            if remover.is_empty() || !before.ends_with(&typed) {
                return None;
            }
            let start = before.len() - typed.len();
            let text = format!(
                "{}{}{}{}",
                &before[..start],
                remover,
                spacer,
                buffer.after_caret()
            );
            Some(BufferState::new(text, buffer.caret()))
        })
    }
}
