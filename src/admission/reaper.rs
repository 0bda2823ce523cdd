//! Background eviction of idle visitors.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::registry::VisitorRegistry;

/// The background task that bounds registry growth.
///
/// Wakes on a fixed interval, sweeps the registry, and evicts every visitor
/// idle longer than the threshold. It is the sole deleter of entries; the
/// request path only ever inserts or mutates in place.
pub struct Reaper;

/// Handle to a running reaper task.
///
/// Dropping the handle leaves the task running for the life of the runtime;
/// call [`shutdown`](ReaperHandle::shutdown) to stop it deterministically
/// during process teardown.
pub struct ReaperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Reaper {
    /// Spawn the reaper loop on the current tokio runtime.
    pub fn spawn(
        registry: Arc<VisitorRegistry>,
        sweep_interval: Duration,
        idle_threshold: Duration,
    ) -> ReaperHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            debug!(
                sweep_interval_secs = sweep_interval.as_secs(),
                idle_threshold_secs = idle_threshold.as_secs(),
                "Reaper started"
            );

            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval fires immediately; consume the first tick so the
            // initial sweep happens one full interval after startup
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = registry.evict_idle(idle_threshold, Instant::now());
                        if evicted > 0 {
                            debug!(
                                evicted = evicted,
                                remaining = registry.len(),
                                "Reaper sweep complete"
                            );
                        }
                    }
                    _ = stop_rx.changed() => {
                        info!("Reaper stopping");
                        break;
                    }
                }
            }
        });

        ReaperHandle { stop_tx, task }
    }
}

impl ReaperHandle {
    /// Signal the reaper loop to stop and wait for it to finish.
    pub async fn shutdown(self) {
        // Receiver dropping with the task counts as stopped too
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
