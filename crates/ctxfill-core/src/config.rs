//! Engine configuration
//!
//! Every field has a default, so a config file only needs to list what it
//! changes.
//!
//! # Example
//!
//! ```
//! use ctxfill_core::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_default_trigger("${")
//!     .with_closing_delimiter("}")
//!     .with_match_any(true);
//!
//! assert_eq!(config.default_trigger(), "${");
//! assert!(config.match_any());
//! ```

use anyhow::Context;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CompletionError, Result};

pub const DEFAULT_TRIGGER: &str = "{{context.";
pub const DEFAULT_CLOSING_DELIMITER: &str = "}}";
pub const DEFAULT_SLUG_PATTERN: &str = r"^[A-Za-z0-9\-_.!]+$";
pub const DEFAULT_MAX_FOREST_DEPTH: usize = 64;

/// Configuration for trigger matching, commit and navigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Literal prefix that opens a placeholder (e.g. `{{context.`)
    default_trigger: String,
    /// Token that closes a completed placeholder
    closing_delimiter: String,
    /// Separator between path segments
    path_separator: char,
    /// Appended to callable leaves before the closing delimiter
    call_suffix: String,
    /// Match partial text anywhere in a candidate instead of only as a prefix
    match_any: bool,
    /// Require a non-word character (or start of text) before a trigger
    whole_word: bool,
    /// Compare triggers and partial text ignoring case
    case_insensitive: bool,
    /// Minimum partial length before suggestions are shown
    min_chars: usize,
    /// Size of the navigable candidate window, 0 for unlimited
    max_options: usize,
    /// What counts as partially typed candidate text after a trigger
    slug_pattern: String,
    /// Appended after a closed placeholder
    spacer: String,
    /// Characters that swap places with a preceding spacer
    space_removers: Vec<String>,
    /// Let Enter reach the host after committing
    pass_through_enter: bool,
    /// Let Tab reach the host after committing
    pass_through_tab: bool,
    /// Forests deeper than this are rejected
    max_forest_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_trigger: DEFAULT_TRIGGER.to_string(),
            closing_delimiter: DEFAULT_CLOSING_DELIMITER.to_string(),
            path_separator: '.',
            call_suffix: "()".to_string(),
            match_any: false,
            whole_word: false,
            case_insensitive: false,
            min_chars: 0,
            max_options: 4,
            slug_pattern: DEFAULT_SLUG_PATTERN.to_string(),
            spacer: String::new(),
            space_removers: vec![",".to_string(), "?".to_string()],
            pass_through_enter: false,
            pass_through_tab: true,
            max_forest_depth: DEFAULT_MAX_FOREST_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document and validate it
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_toml_str(&source)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::debug!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Check the settings that cannot be expressed by types alone
    pub fn validate(&self) -> Result<()> {
        self.slug_regex()?;

        if self.max_forest_depth == 0 {
            return Err(CompletionError::InvalidConfig(
                "max_forest_depth must be at least 1".to_string(),
            ));
        }
        if self.default_trigger.contains(self.path_separator)
            && !self.default_trigger.ends_with(self.path_separator)
        {
            tracing::warn!(
                trigger = %self.default_trigger,
                separator = %self.path_separator,
                "Default trigger contains the path separator in the middle"
            );
        }
        Ok(())
    }

    /// Compile the slug pattern
    pub fn slug_regex(&self) -> Result<Regex> {
        Regex::new(&self.slug_pattern)
            .map_err(|e| CompletionError::InvalidSlugPattern(e.to_string()))
    }

    // ============================================================================
    // Builders
    // ============================================================================

    pub fn with_default_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.default_trigger = trigger.into();
        self
    }

    pub fn with_closing_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.closing_delimiter = delimiter.into();
        self
    }

    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    pub fn with_call_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.call_suffix = suffix.into();
        self
    }

    pub fn with_match_any(mut self, value: bool) -> Self {
        self.match_any = value;
        self
    }

    pub fn with_whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    pub fn with_case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn with_max_options(mut self, max_options: usize) -> Self {
        self.max_options = max_options;
        self
    }

    pub fn with_slug_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.slug_pattern = pattern.into();
        self
    }

    pub fn with_spacer(mut self, spacer: impl Into<String>) -> Self {
        self.spacer = spacer.into();
        self
    }

    pub fn with_space_removers(mut self, removers: Vec<String>) -> Self {
        self.space_removers = removers;
        self
    }

    pub fn with_pass_through_enter(mut self, value: bool) -> Self {
        self.pass_through_enter = value;
        self
    }

    pub fn with_pass_through_tab(mut self, value: bool) -> Self {
        self.pass_through_tab = value;
        self
    }

    pub fn with_max_forest_depth(mut self, depth: usize) -> Self {
        self.max_forest_depth = depth;
        self
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn default_trigger(&self) -> &str {
        &self.default_trigger
    }

    pub fn closing_delimiter(&self) -> &str {
        &self.closing_delimiter
    }

    pub fn path_separator(&self) -> char {
        self.path_separator
    }

    pub fn call_suffix(&self) -> &str {
        &self.call_suffix
    }

    pub fn match_any(&self) -> bool {
        self.match_any
    }

    pub fn whole_word(&self) -> bool {
        self.whole_word
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn max_options(&self) -> usize {
        self.max_options
    }

    pub fn slug_pattern(&self) -> &str {
        &self.slug_pattern
    }

    pub fn spacer(&self) -> &str {
        &self.spacer
    }

    pub fn space_removers(&self) -> &[String] {
        &self.space_removers
    }

    pub fn pass_through_enter(&self) -> bool {
        self.pass_through_enter
    }

    pub fn pass_through_tab(&self) -> bool {
        self.pass_through_tab
    }

    pub fn max_forest_depth(&self) -> usize {
        self.max_forest_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_trigger(), "{{context.");
        assert_eq!(config.closing_delimiter(), "}}");
        assert_eq!(config.path_separator(), '.');
        assert_eq!(config.call_suffix(), "()");
        assert_eq!(config.max_options(), 4);
        assert!(config.pass_through_tab());
        assert!(!config.pass_through_enter());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(indoc! {r#"
            default_trigger = "${"
            closing_delimiter = "}"
            match_any = true
            max_options = 0
        "#})
        .unwrap();

        assert_eq!(config.default_trigger(), "${");
        assert_eq!(config.closing_delimiter(), "}");
        assert!(config.match_any());
        assert_eq!(config.max_options(), 0);
        assert_eq!(config.slug_pattern(), DEFAULT_SLUG_PATTERN);
        assert_eq!(config.space_removers(), &[",".to_string(), "?".to_string()]);
    }

    #[test]
    fn test_invalid_slug_pattern_is_rejected() {
        let result = EngineConfig::from_toml_str(r#"slug_pattern = "[unclosed""#);
        assert!(matches!(result, Err(CompletionError::InvalidSlugPattern(_))));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let config = EngineConfig::default().with_max_forest_depth(0);
        assert!(matches!(
            config.validate(),
            Err(CompletionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let result = EngineConfig::from_toml_str("match_any = maybe");
        assert!(matches!(result, Err(CompletionError::Toml(_))));
    }

    #[test]
    fn test_builder_round_trips_through_toml() {
        let config = EngineConfig::default()
            .with_spacer(" ")
            .with_min_chars(2)
            .with_case_insensitive(true);
        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&serialized).unwrap(), config);
    }
}
