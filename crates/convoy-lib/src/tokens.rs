//! Transient token store
//!
//! An expiring key-value store with single-use invalidation, safe for
//! concurrent access. The wider system uses it for short-lived access
//! tokens; entries have an explicit TTL and are destroyed on first read.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default entry lifetime
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct StoredToken {
    value: String,
    expires_at: Instant,
}

/// Concurrent store of single-use, expiring tokens
#[derive(Debug, Default)]
pub struct TokenStore {
    entries: DashMap<String, StoredToken>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key` for `ttl`. Re-issuing replaces any
    /// previous entry and restarts its lifetime.
    pub fn issue(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.entries.insert(
            key.into(),
            StoredToken {
                value: value.into(),
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Take the value for `key`, destroying the entry. Returns None for an
    /// unknown or expired key; an expired entry is removed all the same.
    pub fn consume(&self, key: &str) -> Option<String> {
        let (_, token) = self.entries.remove(key)?;
        if Instant::now() >= token.expires_at {
            return None;
        }
        Some(token.value)
    }

    /// Drop every expired entry without consuming live ones
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, token| token.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
