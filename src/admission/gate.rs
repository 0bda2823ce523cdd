//! Per-request admission decision.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace};

use super::key::ClientKey;
use super::registry::VisitorRegistry;

/// Message returned to throttled clients.
pub const DENY_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Outcome of an admission check.
///
/// `Deny` is control flow, not an error: the host must skip the protected
/// handler and respond with a "too many requests" status, distinct from any
/// upstream failure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed to the protected handler
    Admit,
    /// Reject with a rate-limit-exceeded response
    Deny,
}

impl Decision {
    /// Whether the request may proceed.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admit)
    }
}

/// Structured body for a rate-limit-exceeded response.
///
/// Serializes to `{"error": "Rate limit exceeded. Please try again later."}`.
/// The host owns status code and transport; this is only the payload.
#[derive(Debug, Clone, Serialize)]
pub struct DenyBody {
    /// Human-readable rejection message
    pub error: &'static str,
}

impl Default for DenyBody {
    fn default() -> Self {
        Self {
            error: DENY_MESSAGE,
        }
    }
}

impl DenyBody {
    /// The payload serialized as a JSON string, for hosts that write the
    /// response body directly.
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.error }).to_string()
    }
}

/// The per-request entry point, invoked once per inbound request before
/// handler dispatch.
///
/// Holds no state of its own beyond the trusted set; every decision is a
/// function of the key, the clock, and the registry.
pub struct Gate {
    registry: Arc<VisitorRegistry>,
    trusted: HashSet<ClientKey>,
}

impl Gate {
    /// Create a gate over an existing registry with a trusted bypass set.
    pub fn new(registry: Arc<VisitorRegistry>, trusted: HashSet<ClientKey>) -> Self {
        Self { registry, trusted }
    }

    /// Decide whether one request from `key` may proceed.
    ///
    /// Trusted keys are admitted unconditionally and never touch the
    /// registry. Everyone else gets their bucket (created full on first
    /// sight) and spends one token if available.
    pub fn decide(&self, key: &ClientKey) -> Decision {
        if self.trusted.contains(key) {
            trace!(key = %key, "Trusted key, bypassing throttle");
            return Decision::Admit;
        }

        let now = Instant::now();
        let bucket = self.registry.get_or_create(key, now);
        let allowed = bucket.lock().try_consume(now);

        if allowed {
            Decision::Admit
        } else {
            debug!(key = %key, "Rate limit exceeded");
            Decision::Deny
        }
    }

    /// The registry this gate decides against.
    pub fn registry(&self) -> &Arc<VisitorRegistry> {
        &self.registry
    }
}
