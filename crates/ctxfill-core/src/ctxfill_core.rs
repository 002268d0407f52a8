//! ctxfill core - data model and shared infrastructure
//!
//! This crate holds the types every other ctxfill crate depends on:
//!
//! - `SuggestionForest` / `SuggestionNode` / `NodeKind` - the typed tree of
//!   names a placeholder can address
//! - `BufferState` - text plus caret, the only cursor truth
//! - `EngineConfig` - trigger, delimiter, matching and navigation settings
//! - `CompletionError` - the error enum shared by all operations
//! - `logging` - subscriber setup for hosts and tests

mod buffer;
mod config;
mod error;
mod forest;
pub mod logging;

pub use buffer::{BufferState, floor_char_boundary};
pub use config::{
    DEFAULT_CLOSING_DELIMITER, DEFAULT_MAX_FOREST_DEPTH, DEFAULT_SLUG_PATTERN, DEFAULT_TRIGGER,
    EngineConfig,
};
pub use error::{CompletionError, Result};
pub use forest::{NodeKind, SuggestionForest, SuggestionNode};
