//! Logging and tracing configuration
//!
//! Logs go to stderr so that reports on stdout stay machine-readable. File
//! logging uses a daily rolling appender and always writes JSON.

use std::io;
use tracing::{debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Error returned when the subscriber cannot be installed
pub type LoggingError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the crate
    pub level: Level,
    /// Whether console output is JSON
    pub json_format: bool,
    /// Directory for rolling log files, if file logging is on
    pub log_directory: Option<String>,
    /// Log file prefix
    pub log_file_prefix: String,
    /// Whether to log span open/close events
    pub enable_span_events: bool,
    /// Whether to use ANSI colors on the console
    pub enable_ansi: bool,
    /// Filter directive overriding `level` and `RUST_LOG`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_directory: None,
            log_file_prefix: "box-separation-simulator".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps background log writers flushing until dropped
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _guards: Vec<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick level and span events from the `--debug` / `--verbose` flags
    ///
    /// Without either flag only warnings are shown.
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Self::new().with_level(Level::DEBUG).with_span_events()
        } else if verbose {
            Self::new().with_level(Level::INFO).with_span_events()
        } else {
            Self::new().with_level(Level::WARN)
        }
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON console output
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Enable file logging
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Set log file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_file_prefix = prefix.into();
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directive used when neither `env_filter` nor `RUST_LOG` is set
    pub fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn build_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.env_filter {
            Some(filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Install the global tracing subscriber
    ///
    /// Hold on to the returned guard for as long as logs should be written.
    pub fn init(self) -> Result<LoggingGuard, LoggingError> {
        let mut guards = Vec::new();

        let (console_writer, console_guard) = non_blocking(io::stderr());
        guards.push(console_guard);

        let console_layer = if self.json_format {
            fmt::layer()
                .json()
                .with_writer(console_writer)
                .with_span_events(self.span_events())
                .boxed()
        } else {
            fmt::layer()
                .with_writer(console_writer)
                .with_ansi(self.enable_ansi)
                .with_target(false)
                .with_span_events(self.span_events())
                .boxed()
        };

        let file_layer = match &self.log_directory {
            Some(directory) => {
                let (file_writer, file_guard) =
                    non_blocking(rolling::daily(directory, &self.log_file_prefix));
                guards.push(file_guard);
                Some(
                    fmt::layer()
                        .json()
                        .with_writer(file_writer)
                        .with_span_events(self.span_events())
                        .boxed(),
                )
            }
            None => None,
        };

        Registry::default()
            .with(self.build_filter()?)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        debug!(config = ?self, "Logging initialized");
        Ok(LoggingGuard { _guards: guards })
    }

    /// Initialize logging for tests (warnings only, no colors)
    pub fn init_test() -> Result<LoggingGuard, LoggingError> {
        Self::new().with_level(Level::WARN).without_ansi().init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_creation() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.json_format);
        assert!(config.log_directory.is_none());
        assert_eq!(config.log_file_prefix, "box-separation-simulator");
        assert!(!config.enable_span_events);
        assert!(config.enable_ansi);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn test_logging_config_builder_pattern() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_json_format()
            .with_file_logging("test_logs")
            .with_file_prefix("test_prefix")
            .with_span_events()
            .without_ansi()
            .with_env_filter("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.json_format);
        assert_eq!(config.log_directory, Some("test_logs".to_string()));
        assert_eq!(config.log_file_prefix, "test_prefix");
        assert!(config.enable_span_events);
        assert!(!config.enable_ansi);
        assert_eq!(config.env_filter, Some("debug".to_string()));
    }

    #[test]
    fn test_levels_from_flags() {
        assert_eq!(LoggingConfig::from_flags(false, false).level, Level::WARN);
        assert_eq!(LoggingConfig::from_flags(true, false).level, Level::INFO);
        assert_eq!(LoggingConfig::from_flags(true, true).level, Level::DEBUG);
        assert!(LoggingConfig::from_flags(false, true).enable_span_events);
        assert!(!LoggingConfig::from_flags(false, false).enable_span_events);
    }

    #[test]
    fn test_default_directive_targets_crate() {
        let config = LoggingConfig::new().with_level(Level::WARN);
        assert_eq!(config.default_directive(), "box_separation_simulator=WARN");
    }

    #[test]
    fn test_invalid_env_filter_is_rejected() {
        let config = LoggingConfig::new().with_env_filter("box_separation_simulator=loudest");
        assert!(config.build_filter().is_err());
    }
}
