use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::cache::MappingCache;
use crate::error::MappingResult;
use crate::repository::MappingRepository;

/// Outcome of one reaper iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapReport {
    pub deleted: usize,
    pub cache_failures: usize,
}

/// Periodic bulk deletion of expired mappings from both tiers.
pub struct MappingReaper {
    storage: Arc<dyn MappingRepository>,
    cache: Arc<dyn MappingCache>,
    interval: Duration,
}

impl MappingReaper {
    pub fn new(
        storage: Arc<dyn MappingRepository>,
        cache: Arc<dyn MappingCache>,
        interval: Duration,
    ) -> Self {
        Self {
            storage,
            cache,
            interval,
        }
    }

    /// One sweep: bulk-delete expired rows, then evict each returned id
    /// from the cache. Cache failures are counted, never fatal.
    pub async fn run_once(&self) -> MappingResult<ReapReport> {
        let ids = self.storage.delete_expired().await?;

        let mut cache_failures = 0;
        for id in &ids {
            if let Err(e) = self.cache.delete_by_id(*id).await {
                warn!(id = %id, error = %e, "failed to delete reaped mapping from cache");
                cache_failures += 1;
            }
        }

        Ok(ReapReport {
            deleted: ids.len(),
            cache_failures,
        })
    }

    /// Sweep on a fixed interval until the shutdown signal flips. A failed
    /// iteration is logged and skipped; the loop itself never dies.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(report) => info!(
                            deleted = report.deleted,
                            cache_failures = report.cache_failures,
                            "reaped expired mappings"
                        ),
                        Err(e) => error!(error = %e, "reaper iteration failed"),
                    }
                }
                _ = shutdown.changed() => {
                    info!("mapping reaper shutting down");
                    return;
                }
            }
        }
    }
}
