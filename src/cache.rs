// =============================================================================
// TTL Cache — keyed response cache with per-entry expiry
// =============================================================================
//
// Adapters consult the cache synchronously before a network call and store
// the decoded response afterwards. Expired entries behave as absent and are
// evicted lazily on `get`, or in bulk with `purge_expired`.
//
// Thread safety: a single parking_lot::RwLock around the map. Reads take the
// shared lock; a read that finds an expired entry upgrades to a write to
// evict it.
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::trace;

struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |t| now < t)
    }
}

/// Thread-safe string-keyed cache; share it through an `Arc`.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => {
                    trace!(key, "cache hit");
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict unless another writer refreshed it meanwhile.
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
            trace!(key, "cache entry expired");
        }
        None
    }

    /// Store `value` under `key` for `ttl_minutes`. A zero TTL stores an
    /// entry that is already expired.
    pub fn put(&self, key: impl Into<String>, value: V, ttl_minutes: u64) {
        self.put_for(key, value, Duration::from_secs(ttl_minutes.saturating_mul(60)));
    }

    pub fn put_for(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .write()
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until evicted.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
