pub mod config;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod query;

pub use config::{Config, FileLoggingConfig, PatternConfig};
pub use error::{Error, Result};
pub use logging::{LogFormat, init_logging};
pub use pattern::EqualityPattern;
pub use query::{LaunchResult, Query};
