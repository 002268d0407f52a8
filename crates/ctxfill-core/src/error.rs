//! Error types for ctxfill

use thiserror::Error;

/// Core error type for completion operations
///
/// Most variants are recoverable by construction: the session turns them into
/// "no suggestions" or a no-op and leaves it to the host whether to surface
/// anything. Only `ForestTooDeep` signals a caller invariant violation.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("No active trigger before the caret")]
    NoActiveTrigger,

    #[error("Trigger path does not address any node: {0}")]
    UnresolvableTriggerPath(String),

    #[error("Commit attempted against an outdated match")]
    StaleCommit,

    #[error("Selection index {index} is out of range for {len} candidates")]
    EmptyCandidateSelection { index: usize, len: usize },

    #[error("Suggestion forest exceeds the maximum depth of {limit}")]
    ForestTooDeep { limit: usize },

    #[error("Invalid slug pattern: {0}")]
    InvalidSlugPattern(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompletionError {
    /// Whether the engine is expected to degrade gracefully on this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CompletionError::NoActiveTrigger
                | CompletionError::UnresolvableTriggerPath(_)
                | CompletionError::StaleCommit
                | CompletionError::EmptyCandidateSelection { .. }
        )
    }
}

/// Result type alias for completion operations
pub type Result<T> = std::result::Result<T, CompletionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(CompletionError::NoActiveTrigger.is_recoverable());
        assert!(CompletionError::StaleCommit.is_recoverable());
        assert!(
            CompletionError::EmptyCandidateSelection { index: 3, len: 0 }.is_recoverable()
        );
        assert!(!CompletionError::ForestTooDeep { limit: 64 }.is_recoverable());
        assert!(!CompletionError::InvalidSlugPattern("[".into()).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = CompletionError::EmptyCandidateSelection { index: 5, len: 2 };
        assert_eq!(
            err.to_string(),
            "Selection index 5 is out of range for 2 candidates"
        );
    }
}
