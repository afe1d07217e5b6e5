//! Periodic eviction of expired cache entries and stale rate-limit keys.
//!
//! Both structures shed stale data lazily on access, but keys that are never
//! touched again would otherwise accumulate forever.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::middleware::cache::ResponseCache;
use crate::middleware::rate_limit::RateLimiter;

/// Interval between sweep passes (in seconds).
const SWEEP_INTERVAL_SECS: u64 = 120;

/// Spawn a background task that periodically sweeps the response cache and
/// rate limiter. Runs until the cancellation token fires.
pub fn start_sweep(
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                () = cancel.cancelled() => {
                    tracing::info!("Maintenance sweep stopped");
                    return;
                }
            }

            cache.sweep_expired().await;
            limiter.sweep_expired().await;
            let cache_entries = cache.len().await;
            let limiter_keys = limiter.key_count().await;
            tracing::debug!(cache_entries, limiter_keys, "Maintenance sweep complete");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweep_task_spawns_and_stops_on_cancel() {
        let cache = Arc::new(ResponseCache::new());
        let limiter = Arc::new(RateLimiter::new());
        let cancel = CancellationToken::new();

        let handle = start_sweep(Arc::clone(&cache), Arc::clone(&limiter), cancel.clone());
        cancel.cancel();
        handle.await.unwrap();
    }
}
