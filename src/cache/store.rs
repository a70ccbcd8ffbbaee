//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and dependency-based invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{
    CacheCounters, CacheEntry, CacheStats, Clock, DependencyIndex, LruTracker, SharedCache,
    SystemClock, TopItem,
};
use crate::config::Config;
use crate::error::Result;

// == Cache Store ==
/// In-process cache with per-entry TTL, LRU eviction and dependency links.
///
/// Every public operation is a single unit of work on `&mut self`; wrap the
/// store in a [`SharedCache`] to share it between tasks.
#[derive(Debug)]
pub struct CacheStore<V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker, always holds exactly the keys of `entries`
    lru: LruTracker,
    /// Dependency links for keys stored via `set_with_dependencies`
    deps: DependencyIndex,
    /// Performance counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL in milliseconds for entries without explicit TTL
    default_ttl_ms: u64,
    /// Whether an overwrite on a full store still evicts
    evict_on_overwrite: bool,
    clock: C,
}

impl<V> CacheStore<V, SystemClock> {
    // == Constructor ==
    /// Creates a new CacheStore on the wall clock.
    ///
    /// Fails with `CacheError::InvalidConfig` for a zero capacity or TTL.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<V, C: Clock> CacheStore<V, C> {
    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(config: &Config, clock: C) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            deps: DependencyIndex::new(),
            counters: CacheCounters::new(),
            max_entries: config.max_entries,
            default_ttl_ms: config.default_ttl_ms,
            evict_on_overwrite: config.evict_on_overwrite,
            clock,
        })
    }

    /// Wraps the store for shared use across tasks.
    pub fn into_shared(self) -> SharedCache<V, C> {
        Arc::new(RwLock::new(self))
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry under `key`.
    ///
    /// When the store is full the least recently accessed entry is evicted
    /// first. With `evict_on_overwrite` (the default) this happens even when
    /// `key` is already present. Dependency links registered for `key` are
    /// kept across a plain overwrite.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds (uses the default if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let key = key.into();
        let now = self.clock.now_ms();

        let is_overwrite = self.entries.contains_key(&key);
        // Eviction may pick `key` itself, which unlinks it
        let links = if is_overwrite {
            self.deps.dependencies_of(&key)
        } else {
            Vec::new()
        };
        if self.entries.len() >= self.max_entries && (self.evict_on_overwrite || !is_overwrite) {
            self.evict_lru();
        }

        let ttl = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.entries
            .insert(key.clone(), CacheEntry::new(value, ttl, now));
        self.lru.touch(&key);
        if !links.is_empty() {
            self.deps.register(&key, links.as_slice());
        }
        self.counters.record_set();
    }

    // == Get ==
    /// Retrieves a copy of the value stored under `key`.
    ///
    /// Expired entries are removed on the spot and reported as misses, so a
    /// read never returns stale data between sweeps.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get_mut(key) else {
            self.counters.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.remove_entry(key);
            self.counters.record_miss();
            return None;
        }

        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.counters.record_hit();
        Some(value)
    }

    // == Invalidate ==
    /// Removes every key containing `pattern`.
    ///
    /// Callers scope invalidation with structured prefixes such as
    /// `"students:"`. An empty pattern matches every key. Returns the number
    /// of removed entries.
    pub fn invalidate(&mut self, pattern: &str) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(pattern) || key.contains(pattern))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }

        debug!(pattern, removed = matching.len(), "invalidated by pattern");
        matching.len()
    }

    // == Set With Dependencies ==
    /// Stores a value and links it to each named dependency.
    ///
    /// The previous links of `key` are replaced by `dependencies`.
    pub fn set_with_dependencies<S: AsRef<str>>(
        &mut self,
        key: impl Into<String>,
        value: V,
        dependencies: &[S],
        ttl_ms: Option<u64>,
    ) {
        let key = key.into();
        self.set(key.clone(), value, ttl_ms);
        self.deps.register(&key, dependencies);
    }

    // == Invalidate Dependencies ==
    /// Removes every entry linked to `dependency`, along with its links.
    ///
    /// Returns the number of removed entries.
    pub fn invalidate_dependencies(&mut self, dependency: &str) -> usize {
        let dependents = self.deps.dependents_of(dependency);
        let removed = dependents
            .iter()
            .filter(|key| self.remove_entry(key).is_some())
            .count();

        debug!(dependency, removed, "invalidated by dependency");
        removed
    }

    // == Stats ==
    /// Returns a statistics snapshot.
    ///
    /// Per-entry size is the serialized JSON length of the value plus the key
    /// length; values that fail to serialize count as zero bytes.
    pub fn stats(&self) -> CacheStats
    where
        V: Serialize,
    {
        let rows = self
            .entries
            .iter()
            .map(|(key, entry)| TopItem {
                key: key.clone(),
                hits: entry.hit_count,
                size_bytes: estimate_size(key, &entry.value),
            })
            .collect();

        CacheStats::from_parts(&self.counters, rows)
    }

    /// Returns the running counters.
    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    // == Clear ==
    /// Removes all entries and links and resets every counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.deps.clear();
        self.counters = CacheCounters::new();
    }

    // == Remove ==
    /// Removes a single entry. Returns false if it was not present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Contains ==
    /// Checks whether `key` holds a live entry, without touching stats or
    /// recency.
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Milliseconds `key` has left to live, or None when it holds no live
    /// entry. Does not touch stats or recency.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining_ms(now))
    }

    /// Dependency names registered for `key`.
    pub fn dependencies_of(&self, key: &str) -> Vec<String> {
        self.deps.dependencies_of(key)
    }

    // == Sweep Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        expired_keys.len()
    }

    // == Length ==
    /// Returns the number of entries physically present, swept or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    // == Internal Helpers ==
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.deps.unlink(key);
        Some(entry)
    }

    /// Evicts the entry with the smallest `last_accessed_at`. Equal
    /// timestamps fall back to touch order, oldest first.
    fn evict_lru(&mut self) {
        let victim = self
            .lru
            .oldest_first()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|entry| (key, entry.last_accessed_at))
            })
            .min_by_key(|(_, accessed_at)| *accessed_at)
            .map(|(key, _)| key.to_string());

        if let Some(key) = victim {
            self.remove_entry(&key);
            self.counters.record_eviction();
            debug!(key = %key, "evicted least recently used entry");
        }
    }
}

fn estimate_size<V: Serialize>(key: &str, value: &V) -> usize {
    serde_json::to_vec(value)
        .map(|bytes| bytes.len() + key.len())
        .unwrap_or(0)
}
