//! Time-bounded cache of resolved identities.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use github_authn_sdk::Identity;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tokio::time::Instant;

/// Lookup key derived from a login and token.
///
/// A SHA-256 digest over the length-prefixed login followed by the token, so
/// the raw token is never retained and no separator can make two different
/// pairs collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    #[must_use]
    pub fn new(login: &str, token: &SecretString) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((login.len() as u64).to_be_bytes());
        hasher.update(login.as_bytes());
        hasher.update(token.expose_secret().as_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheKey({:02x}{:02x}{:02x}{:02x}..)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

struct CacheEntry {
    value: Arc<Identity>,
    inserted_at: Instant,
}

/// Concurrent map from [`CacheKey`] to identity with a uniform TTL.
///
/// An entry is live strictly less than `ttl` after insertion. Expired
/// entries are dropped lazily on read, or eagerly by [`purge_expired`](Self::purge_expired).
pub struct PrincipalCache {
    entries: DashMap<CacheKey, CacheEntry>,
    ttl: Duration,
}

impl PrincipalCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Identity>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key)
            && self.is_live(&entry, now)
        {
            return Some(Arc::clone(&entry.value));
        }
        // Only remove what is still expired; a racing put may have refreshed it.
        self.entries
            .remove_if(key, |_, entry| !self.is_live(entry, now));
        None
    }

    pub fn put(&self, key: CacheKey, value: Arc<Identity>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_live(entry, now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, expired ones included until they are purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_live(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }
}

impl fmt::Debug for PrincipalCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
