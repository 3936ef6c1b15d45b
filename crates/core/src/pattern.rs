//! Plugin-supplied equality patterns.
//!
//! A plugin whose result titles or subtitles carry volatile text (counters,
//! timestamps, paths) can attach a pattern to the result. Pin matching then
//! compares only what the pattern captures instead of the whole string.
//!
//! Patterns are compiled with the `regex` crate, which matches in time linear
//! to the input and never backtracks. The only resource knob is the compiled
//! size, bounded through [`PatternConfig`].

use crate::config::PatternConfig;
use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::str::FromStr;

/// A compiled equality pattern. Cloning is cheap and shares the compiled program.
#[derive(Debug, Clone)]
pub struct EqualityPattern {
    regex: Regex,
}

impl EqualityPattern {
    /// Compile a pattern with the default limits
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_limits(pattern, &PatternConfig::default())
    }

    /// Compile a pattern with explicit limits
    pub fn with_limits(pattern: &str, config: &PatternConfig) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .size_limit(config.size_limit)
            .dfa_size_limit(config.dfa_size_limit)
            .case_insensitive(config.case_insensitive)
            .build()
            .map_err(|source| Error::invalid_pattern(pattern, source))?;

        tracing::trace!(pattern, groups = regex.captures_len() - 1, "compiled equality pattern");
        Ok(Self { regex })
    }

    /// The pattern source text
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of explicit capturing groups, not counting the implicit whole match
    pub fn explicit_groups(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Whether only the whole match is exposed
    pub fn is_whole_match(&self) -> bool {
        self.explicit_groups() == 0
    }
}

impl fmt::Display for EqualityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EqualityPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
