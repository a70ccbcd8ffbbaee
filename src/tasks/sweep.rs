//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries so that
//! values written once and never read again do not hold memory forever.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Clock, SharedCache};

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// The task sleeps for `interval` between runs and holds the write lock only
/// for the duration of one sweep, so `get`/`set` callers are never blocked
/// for longer than a single scan. Reads do not depend on the sweep: they
/// check expiry themselves.
///
/// # Arguments
/// * `cache` - shared reference to the cache
/// * `interval` - time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task. The caller owns its lifecycle and
/// aborts it on shutdown.
///
/// # Example
/// ```ignore
/// let cache = CacheStore::<String>::new(&Config::default())?.into_shared();
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V, C>(cache: SharedCache<V, C>, interval: Duration) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
    C: Clock,
{
    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
