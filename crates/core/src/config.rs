use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default compiled-program size limit for plugin patterns (10 MiB, the regex crate's own default)
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// Default lazy DFA cache limit for plugin patterns (2 MiB)
pub const DEFAULT_PATTERN_DFA_SIZE_LIMIT: usize = 2 * (1 << 20);

/// Limits applied when compiling plugin-supplied equality patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    /// Upper bound on the compiled program size, in bytes
    #[serde(default = "default_size_limit")]
    pub size_limit: usize,

    /// Upper bound on the lazy DFA cache, in bytes
    #[serde(default = "default_dfa_size_limit")]
    pub dfa_size_limit: usize,

    /// Compile every pattern case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,
}

fn default_size_limit() -> usize {
    DEFAULT_PATTERN_SIZE_LIMIT
}

fn default_dfa_size_limit() -> usize {
    DEFAULT_PATTERN_DFA_SIZE_LIMIT
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self { size_limit: default_size_limit(), dfa_size_limit: default_dfa_size_limit(), case_insensitive: false }
    }
}

/// File output settings for the `[logging.file]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileLoggingConfig {
    /// Write JSON logs to a daily-rolling file
    #[serde(default)]
    pub enabled: bool,

    /// Log directory (absolute). Falls back to `LAUNCHPIN_LOG_DIR`, then `~/.launchpin/logs`
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// The `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive when neither `LAUNCHPIN_LOG` nor `RUST_LOG` is set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Stderr format: "pretty", "json" or "compact"
    #[serde(default = "default_log_format")]
    pub format: String,

    #[serde(default)]
    pub file: FileLoggingConfig,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for launchpin.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Compilation limits for plugin equality patterns
    #[serde(default)]
    pub patterns: PatternConfig,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| crate::Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        use crate::Error;

        if crate::logging::LogFormat::parse_str(&self.logging.format).is_none() {
            return Err(Error::Config(
                ConfigError::InvalidLogFormat(self.logging.format.clone()).to_string(),
            ));
        }

        if let Some(dir) = &self.logging.file.directory
            && !dir.is_absolute()
        {
            return Err(Error::Config(
                ConfigError::AbsolutePathRequired("logging.file.directory".to_string()).to_string(),
            ));
        }

        if self.patterns.size_limit == 0 {
            return Err(Error::Config(ConfigError::ZeroLimit("patterns.size_limit").to_string()));
        }
        if self.patterns.dfa_size_limit == 0 {
            return Err(Error::Config(ConfigError::ZeroLimit("patterns.dfa_size_limit").to_string()));
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# launchpin configuration example

[logging]
# Default filter when LAUNCHPIN_LOG / RUST_LOG are unset
level = "warn"
# Stderr format: "pretty", "json", or "compact"
format = "pretty"

[logging.file]
# Daily-rolling JSON log file
enabled = false
# Must be absolute when set
# directory = "/var/log/launchpin"

[patterns]
# Compiled program size limit for plugin equality patterns, in bytes
size_limit = 10485760
# Lazy DFA cache limit, in bytes
dfa_size_limit = 2097152
# Compile every pattern case-insensitively
case_insensitive = false
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Unknown log format name
    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    /// Absolute path required
    #[error("absolute path required: {0}")]
    AbsolutePathRequired(String),

    /// A size limit was set to zero
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
