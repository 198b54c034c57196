//! Background task that periodically evicts idle cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::ExpiringCache;

/// Spawns the cache sweeper.
///
/// Every `interval` the task removes entries idle for longer than `max_idle`.
/// The first sweep happens one full `interval` after spawning. The task exits
/// once `shutdown` is cancelled; await the returned handle to join it.
///
/// # Example
///
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let handle = spawn_sweeper(cache.clone(), ttl, ttl, shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweeper(
    cache: Arc<ExpiringCache>,
    interval: Duration,
    max_idle: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?interval, ?max_idle, "Cache sweeper started");

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = cache.sweep(max_idle);

                    if removed > 0 {
                        metrics::counter!("cache_evictions_total").increment(removed as u64);
                        info!(removed, remaining = cache.len(), "Cache sweep evicted idle entries");
                    } else {
                        debug!("Cache sweep: nothing to evict");
                    }
                }
            }
        }

        info!("Cache sweeper stopped");
    })
}
