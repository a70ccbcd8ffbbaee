//! LearnSpark Cache - An in-process cache for application services
//!
//! Provides TTL expiration, LRU eviction, pattern and dependency-based
//! invalidation, an opt-in cached HTTP fetch decorator and an admin API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, CacheStore, SharedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{CachedFetcher, CachedResponse, FetchOptions};
pub use tasks::spawn_sweep_task;
