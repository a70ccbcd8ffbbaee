//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access metadata.

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion or last overwrite timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime relative to `stored_at`, in milliseconds
    pub ttl_ms: u64,
    /// Last successful read (or insertion) timestamp
    pub last_accessed_at: u64,
    /// Successful reads since insertion
    pub hit_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stored at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_ms` - TTL in milliseconds
    /// * `now` - Current time in Unix milliseconds
    pub fn new(value: V, ttl_ms: u64, now: u64) -> Self {
        Self {
            value,
            stored_at: now,
            ttl_ms,
            last_accessed_at: now,
            hit_count: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry stays live while `now - stored_at <= ttl_ms`, so it is still
    /// readable at exactly `stored_at + ttl_ms` and expired one millisecond
    /// later.
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.stored_at) > self.ttl_ms
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds at `now`, zero once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.stored_at
            .saturating_add(self.ttl_ms)
            .saturating_sub(now)
    }

    // == Touch ==
    /// Records a successful read at `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = now;
        self.hit_count += 1;
    }
}
