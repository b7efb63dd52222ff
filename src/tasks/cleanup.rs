//! Expiry Sweep Task
//!
//! Background task that periodically purges expired cache entries. Lookups
//! already ignore expired entries; the sweep only reclaims their memory.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::executor::SharedCache;

/// Spawns a background task that periodically removes expired cache entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between runs
/// and holding the cache write lock only while purging.
///
/// # Arguments
/// * `cache` - Shared handle to the cache the executor uses
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.cleanup_expired();

            if removed > 0 {
                info!(removed, "expiry sweep removed expired entries");
            } else {
                debug!("expiry sweep found no expired entries");
            }
        }
    })
}
