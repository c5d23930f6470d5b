use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Default freshness window for day-keyed occupancy lookups. Short enough
/// that the table-picker UI polling it cannot mask a just-confirmed booking
/// for long; the real double-booking guard is the caller's commit-time
/// constraint.
pub const DEFAULT_OCCUPANCY_TTL: Duration = Duration::from_secs(30);

struct CacheEntry<V> {
    inserted_at: Instant,
    value: Arc<V>,
}

/// Time-bounded map. Entries expire on their own TTL and only on their TTL;
/// there is no manual invalidation.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.get_at(key, Instant::now())
    }

    /// Store a value and hand back the shared allocation, so a miss path
    /// can return exactly what later hits will see.
    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        self.insert_at(key, value, Instant::now())
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Clock-taking internals so expiry is testable without sleeping.

    fn get_at(&self, key: &K, now: Instant) -> Option<Arc<V>> {
        if let Some(entry) = self.entries.get(key) {
            if now.duration_since(entry.inserted_at) < self.ttl {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }
        // Expired: remove outside the read guard to avoid deadlocking the shard.
        self.entries.remove(key);
        None
    }

    fn insert_at(&self, key: K, value: V, now: Instant) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CacheEntry {
                inserted_at: now,
                value: value.clone(),
            },
        );
        value
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.duration_since(e.inserted_at) < self.ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("purged {removed} expired cache entries");
        }
        removed
    }
}
