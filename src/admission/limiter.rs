//! Fully wired admission controller.

use std::sync::Arc;

use tracing::info;

use crate::config::LimiterConfig;

use super::gate::{Decision, Gate};
use super::key::ClientKey;
use super::reaper::{Reaper, ReaperHandle};
use super::registry::VisitorRegistry;

/// An admission controller with its registry and reaper wired up.
///
/// One limiter is constructed per process at startup and owned by the host;
/// there is no ambient global. State lives only in memory, so a restart
/// forgets all bucket history and every client starts fresh.
pub struct Limiter {
    gate: Gate,
    reaper: ReaperHandle,
}

impl Limiter {
    /// Build the registry and gate from configuration and spawn the reaper.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(config: LimiterConfig) -> Self {
        let registry = Arc::new(VisitorRegistry::new(config.burst, config.refill_interval()));
        let reaper = Reaper::spawn(
            Arc::clone(&registry),
            config.sweep_interval(),
            config.idle_threshold(),
        );
        let gate = Gate::new(registry, config.trusted_set());

        info!(
            burst = config.burst,
            refill_interval_ms = config.refill_interval_ms,
            trusted_keys = config.trusted_keys.len(),
            "Admission controller started"
        );

        Self { gate, reaper }
    }

    /// Decide whether one request from `key` may proceed.
    pub fn decide(&self, key: &ClientKey) -> Decision {
        self.gate.decide(key)
    }

    /// Number of clients currently tracked by the registry.
    pub fn visitor_count(&self) -> usize {
        self.gate.registry().len()
    }

    /// Stop the reaper and wait for it to finish.
    pub async fn shutdown(self) {
        self.reaper.shutdown().await;
        info!("Admission controller stopped");
    }
}
