//! Configuration Module
//!
//! Handles loading the path delimiter and cache defaults from environment variables.

use std::env;

use crate::error::{Error, Result};

/// Default delimiter for path strings.
pub const DEFAULT_DELIMITER: char = '.';

/// Default cache item lifetime in seconds.
pub const DEFAULT_LIFETIME: i64 = 3600;

/// Helper configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Delimiter used to split path strings into segments
    pub delimiter: char,
    /// Lifetime in seconds reported by cache items without an explicit expiration
    pub default_lifetime: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `ARR_DELIMITER` - Path delimiter, a single character (default: `.`)
    /// - `CACHE_DEFAULT_LIFETIME` - Cache item lifetime in seconds (default: 3600)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source, e.g. a map in tests.
    ///
    /// Absent or invalid values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            delimiter: lookup("ARR_DELIMITER")
                .and_then(|v| single_char(&v))
                .unwrap_or(DEFAULT_DELIMITER),
            default_lifetime: lookup("CACHE_DEFAULT_LIFETIME")
                .and_then(|v| v.parse().ok())
                .filter(|secs: &i64| *secs >= 0)
                .unwrap_or(DEFAULT_LIFETIME),
        }
    }

    // == Validate ==
    /// Checks that the configured values can be used by the helpers.
    ///
    /// The wildcard character cannot double as a delimiter.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == '*' {
            return Err(Error::Config(
                "delimiter cannot be the wildcard character '*'".to_string(),
            ));
        }
        if self.default_lifetime < 0 {
            return Err(Error::Config(format!(
                "default lifetime must not be negative, got {}",
                self.default_lifetime
            )));
        }
        Ok(())
    }
}

fn single_char(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            default_lifetime: DEFAULT_LIFETIME,
        }
    }
}
