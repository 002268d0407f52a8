//! ctxfill engine - placeholder completion over plain text buffers
//!
//! Typing a trigger such as `{{context.` opens a popup listing the root
//! names of a [`SuggestionForest`](ctxfill_core::SuggestionForest).
//! Committing a name with children extends the placeholder by one segment
//! and lists the children; committing a leaf closes it with `}}` (or `()}}`
//! for callables).
//!
//! The pieces can be used on their own:
//!
//! - [`TriggerScanner`] finds the active trigger before the caret
//! - [`ForestResolver`] maps a dotted trigger path to a forest node
//! - [`TriggerSetBuilder`] precomputes every valid trigger of a forest
//! - [`CommitPlanner`] splices a committed candidate into the buffer
//! - [`NavigationState`] tracks the popup selection
//!
//! [`CompletionSession`] wires them together for a host editor.

mod candidates;
mod commit;
mod highlight;
mod navigation;
mod resolver;
mod scanner;
mod session;
mod trigger_set;

pub use candidates::{Candidate, filter_candidates};
pub use commit::{Closing, CommitPlan, CommitPlanner};
pub use highlight::{PlaceholderHighlighter, PlaceholderSpan};
pub use navigation::{KeyAction, KeyBindings, NavigationKey, NavigationState};
pub use resolver::{CandidateLevel, ForestResolver, ResolvedNode};
pub use scanner::{ScanOptions, TriggerMatch, TriggerScanner};
pub use session::{
    CandidateRequest, CandidateResponse, CompletionSession, KeyOutcome, SessionUpdate,
};
pub use trigger_set::{CacheStats, TriggerSet, TriggerSetBuilder, TriggerSetCache};
