//! Error types for tickcache.
//!
//! Lookups never fail: a miss is `None` or `false`. The errors here cover
//! rejected configuration and failed self-checks.
//!
//! - [`ConfigError`]: a capacity was rejected (zero on construction or
//!   resize).
//! - [`InvariantError`]: returned by
//!   [`LruCore::check_invariants`](crate::policy::lru::LruCore::check_invariants)
//!   when the columns or the recency window disagree.
//!
//! Producer failures in `get_or_set` are not wrapped; the caller's own error
//! type comes back unchanged.
//!
//! ```
//! use tickcache::error::ConfigError;
//! use tickcache::policy::lru::LruCore;
//!
//! match LruCore::<u64, String>::try_new(0) {
//!     Err(ConfigError::ZeroCapacity) => {},
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;

/// Rejected cache configuration.
///
/// Produced by [`LruCore::try_new`](crate::policy::lru::LruCore::try_new),
/// [`LruCore::resize`](crate::policy::lru::LruCore::resize) and the builder's
/// `try_build*` methods. The panicking constructors use its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A capacity of zero; the cache could never hold an entry.
    ZeroCapacity,
}

impl ConfigError {
    pub fn message(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "cache capacity must be greater than zero",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ConfigError {}

/// A failed self-check, carrying which invariant broke.
///
/// e.g. a length mismatch between the key and value columns, or a tick
/// outside the recency window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError {
    detail: String,
}

impl InvariantError {
    #[inline]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant violated: {}", self.detail)
    }
}

impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_mentions_capacity() {
        let err = ConfigError::ZeroCapacity;
        assert!(err.message().contains("capacity"));
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn invariant_display_prefixes_detail() {
        let err = InvariantError::new("tick 7 outside window [2, 6]");
        assert_eq!(err.message(), "tick 7 outside window [2, 6]");
        assert_eq!(
            err.to_string(),
            "invariant violated: tick 7 outside window [2, 6]"
        );
    }

    #[test]
    fn errors_are_thread_safe_std_errors() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }
}
