//! Cache Item Module
//!
//! Defines a single cache item with hit tracking, lazy expiration and tags.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::config::{Config, DEFAULT_LIFETIME};
use crate::error::{Error, Result};
use crate::value::Value;

static UNSAFE_KEY_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_.]").expect("UNSAFE_KEY_CHARS should compile - this is a bug")
});

// == Lifetime ==
/// Relative expiration accepted by [`CacheItem::expires_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Whole seconds from now, may be negative
    Seconds(i64),
    /// A signed duration from now
    Duration(Duration),
}

impl From<i64> for Lifetime {
    fn from(secs: i64) -> Self {
        Lifetime::Seconds(secs)
    }
}

impl From<Duration> for Lifetime {
    fn from(duration: Duration) -> Self {
        Lifetime::Duration(duration)
    }
}

impl From<std::time::Duration> for Lifetime {
    fn from(duration: std::time::Duration) -> Self {
        Lifetime::Seconds(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
    }
}

// == Cache Item Trait ==
/// Capabilities of a cache item as seen by a cache pool.
pub trait CacheItem {
    /// Returns the key this item was created for.
    fn key(&self) -> &str;

    /// Returns the value, or `None` whenever [`CacheItem::is_hit`] is false.
    fn get(&self) -> Option<&Value>;

    /// Stores a value. A `false` value is recorded as a miss.
    fn set(&mut self, value: Value) -> &mut Self;

    /// Confirms the lookup resulted in a hit that has not expired yet.
    fn is_hit(&self) -> bool;

    /// Sets an absolute expiration, or clears it with `None`.
    fn expires_at(&mut self, expiration: Option<DateTime<Utc>>) -> &mut Self;

    /// Sets an expiration relative to now, or clears it with `None`.
    fn expires_after(&mut self, time: Option<Lifetime>) -> &mut Self;
}

// == Item ==
/// A single cache item.
#[derive(Debug, Clone)]
pub struct Item {
    /// Original key
    key: String,
    /// Storage-safe key, derived from `key` unless a backend provides one
    sanitized_key: Option<String>,
    /// Stored value, only visible while the item is a hit
    value: Value,
    /// Whether the lookup produced a value
    hit: bool,
    /// Explicit lifetime in seconds, None = use the default
    lifetime: Option<i64>,
    /// Expiration time, None = never expires
    expiration: Option<DateTime<Utc>>,
    tags: BTreeSet<String>,
    /// Lifetime reported when none was set
    default_lifetime: i64,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            key: String::new(),
            sanitized_key: None,
            value: Value::Null,
            hit: false,
            lifetime: None,
            expiration: None,
            tags: BTreeSet::new(),
            default_lifetime: DEFAULT_LIFETIME,
        }
    }
}

impl Item {
    // == Constructor ==
    /// Creates a miss for `key`, deriving its sanitized key.
    pub fn new(key: impl Into<String>) -> Self {
        let mut item = Self::default();
        item.set_key(key);
        item
    }

    /// Creates a miss for `key` that reports the configured default lifetime.
    pub fn with_config(key: impl Into<String>, config: &Config) -> Self {
        let mut item = Self::new(key);
        item.default_lifetime = config.default_lifetime;
        item
    }

    // == Keys ==
    /// Sets the original key and re-derives the sanitized key.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
        self.sanitized_key = Some(sanitize_key(&self.key));
    }

    /// Overrides the sanitized key, e.g. with an id chosen by a storage backend.
    pub fn set_sanitized_key(&mut self, key: impl Into<String>) {
        self.sanitized_key = Some(key.into());
    }

    pub fn sanitized_key(&self) -> Option<&str> {
        self.sanitized_key.as_deref()
    }

    // == Hit ==
    pub fn set_hit(&mut self, hit: bool) {
        self.hit = hit;
    }

    // == Lifetime ==
    /// Returns the lifetime in seconds, falling back to the default lifetime.
    pub fn lifetime(&self) -> i64 {
        self.lifetime.unwrap_or(self.default_lifetime)
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.expiration
    }

    /// Sets the expiration from a dynamic value.
    ///
    /// Accepts `null` (never expires), an integer Unix timestamp or an
    /// RFC 3339 string.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] for any other type, naming it
    /// - [`Error::InvalidArgument`] for an unparsable or out-of-range timestamp
    pub fn expires_at_value(&mut self, expiration: &Value) -> Result<&mut Self> {
        let expiration = match expiration {
            Value::Null => None,
            Value::Int(ts) => Some(DateTime::<Utc>::from_timestamp(*ts, 0).ok_or_else(|| {
                Error::InvalidArgument(format!("Expiration timestamp {} is out of range", ts))
            })?),
            Value::String(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| {
                        Error::InvalidArgument(format!(
                            "Expiration '{}' is not an RFC 3339 timestamp: {}",
                            raw, e
                        ))
                    })?
                    .with_timezone(&Utc),
            ),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "Expiration must be a Unix timestamp, an RFC 3339 string or null, {} given",
                    other.type_name()
                )))
            }
        };
        Ok(self.expires_at(expiration))
    }

    // == Tags ==
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Replaces all tags.
    pub fn set_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    fn clear_expiration(&mut self) {
        self.expiration = None;
        self.lifetime = None;
    }
}

impl CacheItem for Item {
    fn key(&self) -> &str {
        &self.key
    }

    fn get(&self) -> Option<&Value> {
        if self.is_hit() {
            Some(&self.value)
        } else {
            None
        }
    }

    fn set(&mut self, value: Value) -> &mut Self {
        self.hit = value != Value::Bool(false);
        trace!(key = %self.key, hit = self.hit, "cache item value set");
        self.value = value;
        self
    }

    /// Expiration is checked against the clock on every call.
    fn is_hit(&self) -> bool {
        if !self.hit {
            return false;
        }
        !matches!(self.expiration, Some(expires) if expires < Utc::now())
    }

    fn expires_at(&mut self, expiration: Option<DateTime<Utc>>) -> &mut Self {
        let Some(expires) = expiration else {
            self.clear_expiration();
            return self;
        };

        let remaining = expires.timestamp().saturating_sub(Utc::now().timestamp());
        self.expiration = Some(expires);
        self.lifetime = Some(remaining.max(0));
        debug!(key = %self.key, %expires, "cache item expiration set");
        self
    }

    fn expires_after(&mut self, time: Option<Lifetime>) -> &mut Self {
        let Some(time) = time else {
            self.clear_expiration();
            return self;
        };

        let now = Utc::now();
        let expires = match time {
            Lifetime::Seconds(secs) => Duration::try_seconds(secs)
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(if secs < 0 {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    DateTime::<Utc>::MAX_UTC
                }),
            Lifetime::Duration(delta) => {
                now.checked_add_signed(delta)
                    .unwrap_or(if delta < Duration::zero() {
                        DateTime::<Utc>::MIN_UTC
                    } else {
                        DateTime::<Utc>::MAX_UTC
                    })
            }
        };

        let remaining = match time {
            Lifetime::Seconds(secs) => secs,
            Lifetime::Duration(_) => expires.timestamp().saturating_sub(now.timestamp()),
        };
        self.expiration = Some(expires);
        self.lifetime = Some(remaining.max(0));
        debug!(key = %self.key, %expires, "cache item expiration set");
        self
    }
}

// == Utility Functions ==
/// Trims the key and replaces every byte outside `[A-Za-z0-9_.]` with `_`.
pub fn sanitize_key(key: &str) -> String {
    UNSAFE_KEY_CHARS
        .replace_all(key.trim(), |caps: &Captures| "_".repeat(caps[0].len()))
        .into_owned()
}
