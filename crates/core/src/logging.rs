//! Logging setup built on the tracing ecosystem.
//!
//! The store and equality code only emit `tracing` events; a binary embedding
//! launchpin decides where they go by calling [`init_logging`] once at startup.
//!
//! # Environment Variables
//!
//! - `LAUNCHPIN_LOG`: Filter directive (like `RUST_LOG`), e.g., `launchpin_store=debug`
//! - `LAUNCHPIN_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//! - `LAUNCHPIN_LOG_DIR`: Directory for file output when `[logging.file]` has none
//!
//! # Example
//!
//! ```no_run
//! use launchpin_core::logging::{self, LoggingConfig};
//!
//! let _guard = logging::init_logging(Some(LoggingConfig::default().with_level("debug")))?;
//! # Ok::<(), launchpin_core::Error>(())
//! ```

use crate::Error;
use crate::config::{FileLoggingConfig, LoggingConfig as ConfigLoggingConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Pretty, human-readable output with colors (default for TTY)
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

/// Runtime logging settings, resolved from the `[logging]` config section.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level for stderr output.
    pub level: String,
    /// Output format for stderr. `None` means detect from the environment.
    pub format: Option<LogFormat>,
    /// File logging configuration (optional).
    pub file: Option<FileLoggingConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: None, file: None }
    }
}

impl From<ConfigLoggingConfig> for LoggingConfig {
    fn from(config: ConfigLoggingConfig) -> Self {
        Self {
            level: config.level,
            format: LogFormat::parse_str(&config.format),
            file: if config.file.enabled { Some(config.file) } else { None },
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Enable file logging.
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file = Some(config);
        self
    }

    /// Build an EnvFilter from this config and environment variables.
    fn build_env_filter(&self) -> EnvFilter {
        let filter = env::var("LAUNCHPIN_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| self.level.clone());

        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    fn is_tty() -> bool {
        atty::is(atty::Stream::Stderr)
    }

    /// Determine the format for stderr output: environment, then config, then TTY detection.
    fn detect_format(&self) -> LogFormat {
        if let Ok(fmt_str) = env::var("LAUNCHPIN_LOG_FORMAT")
            && let Some(fmt) = LogFormat::parse_str(&fmt_str)
        {
            return fmt;
        }

        if let Some(format) = self.format {
            return format;
        }

        if Self::is_tty() { LogFormat::Pretty } else { LogFormat::Compact }
    }

    /// Resolve the log directory for file output.
    fn log_dir(file: &FileLoggingConfig) -> Result<PathBuf, Error> {
        if let Some(dir) = &file.directory {
            return Ok(dir.clone());
        }

        if let Ok(custom_dir) = env::var("LAUNCHPIN_LOG_DIR") {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| Error::Config("Could not determine home directory".to_string()))?;

        Ok(PathBuf::from(home).join(".launchpin").join("logs"))
    }
}

/// Initialize the global tracing subscriber.
///
/// Sets up an `EnvFilter` (from `LAUNCHPIN_LOG`, `RUST_LOG`, or the configured
/// level), formatted stderr output, and optional daily-rolling JSON file output.
///
/// The returned guard flushes the file writer on drop; hold it for the life of
/// the process. It is `None` when file logging is disabled. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<Option<WorkerGuard>, Error> {
    let config = config.unwrap_or_default();
    let env_filter = config.build_env_filter();
    let format = config.detect_format();

    let registry = Registry::default().with(env_filter);
    let init_err = |e: tracing_subscriber::util::TryInitError| Error::Config(format!("Failed to install logger: {e}"));

    if let Some(file_config) = &config.file {
        let log_dir = LoggingConfig::log_dir(file_config)?;
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| Error::Config(format!("Failed to create log directory: {}", e)))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, "launchpin.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        match format {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init()
                .map_err(init_err)?,
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init()
                .map_err(init_err)?,
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .with(fmt::layer().json().with_writer(non_blocking))
                .try_init()
                .map_err(init_err)?,
        }

        Ok(Some(guard))
    } else {
        match format {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                .try_init()
                .map_err(init_err)?,
            LogFormat::Json => registry
                .with(fmt::layer().json().with_writer(io::stderr))
                .try_init()
                .map_err(init_err)?,
            LogFormat::Compact => registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .try_init()
                .map_err(init_err)?,
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str_round_trips() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_logging_config_from_config_section() {
        let section = ConfigLoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
            file: FileLoggingConfig { enabled: false, directory: None },
        };

        let config = LoggingConfig::from(section);
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, Some(LogFormat::Json));
        assert!(config.file.is_none());
    }

    #[test]
    fn test_logging_config_keeps_enabled_file_section() {
        let section = ConfigLoggingConfig {
            file: FileLoggingConfig { enabled: true, directory: Some(PathBuf::from("/tmp/launchpin-logs")) },
            ..ConfigLoggingConfig::default()
        };

        let config = LoggingConfig::from(section);
        let file = config.file.expect("file logging should stay enabled");
        assert_eq!(LoggingConfig::log_dir(&file).unwrap(), PathBuf::from("/tmp/launchpin-logs"));
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .with_level("trace")
            .with_format(LogFormat::Compact)
            .with_file_logging(FileLoggingConfig::default());

        assert_eq!(config.level, "trace");
        assert_eq!(config.format, Some(LogFormat::Compact));
        assert!(config.file.is_some());
    }
}
