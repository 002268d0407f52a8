//! Logging setup for hosts and tests
//!
//! The engine itself only emits `tracing` events. Hosts that do not already
//! install a subscriber can use [`init`]; tests use [`init_for_tests`], which
//! is safe to call from every test.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to log span open/close events
    pub enable_spans: bool,

    /// Default log level filter, used when RUST_LOG is unset
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            include_location: cfg!(debug_assertions),
            enable_spans: false,
            default_filter: "warn,ctxfill_core=info,ctxfill_engine=info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Verbose console output for local debugging
    pub fn development() -> Self {
        Self {
            json: false,
            include_location: true,
            enable_spans: true,
            default_filter: "debug,ctxfill_core=trace,ctxfill_engine=trace".to_string(),
        }
    }

    /// Structured output for log collection
    pub fn production() -> Self {
        Self {
            json: true,
            include_location: false,
            enable_spans: false,
            default_filter: "warn,ctxfill_engine=info".to_string(),
        }
    }

    pub fn testing() -> Self {
        Self {
            json: false,
            include_location: true,
            enable_spans: false,
            default_filter: "debug".to_string(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        // RUST_LOG takes precedence over the configured default
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Install a global subscriber for the given configuration.
///
/// Fails if a global subscriber is already set.
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let span_events = if config.enable_spans {
        fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE
    } else {
        fmt::format::FmtSpan::NONE
    };

    let layer = if config.json {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_filter(config.env_filter())
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_span_events(span_events)
            .with_filter(config.env_filter())
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::info!(
        json = config.json,
        filter = %config.default_filter,
        "Logging initialized"
    );

    Ok(())
}

/// Install a test-writer subscriber once per process
pub fn init_for_tests() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(LoggingConfig::testing().env_filter())
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert!(!config.json);
        assert!(!config.enable_spans);
        assert!(config.default_filter.contains("ctxfill_engine"));
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert!(config.json);
        assert!(!config.include_location);
    }

    #[test]
    fn test_init_refuses_second_subscriber() {
        // Whichever call installs first, a global subscriber is set afterwards
        let _ = init(LoggingConfig::testing());
        let err = init(LoggingConfig::testing()).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_init_for_tests_is_idempotent() {
        init_for_tests();
        init_for_tests();
        tracing::debug!("still alive");
    }
}
