//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and
//! dependency-based invalidation.

mod clock;
mod deps;
mod entry;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use deps::DependencyIndex;
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::{CacheCounters, CacheStats, TopItem, TOP_ITEMS_LIMIT};
pub use store::CacheStore;

/// A store shared between tasks. Each store operation runs under the lock
/// as one atomic step; `get` mutates recency, so reads take the write lock.
pub type SharedCache<V, C = SystemClock> = Arc<RwLock<CacheStore<V, C>>>;
