//! Concurrency-safe registry of per-client visitor state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::bucket::TokenBucket;
use super::key::ClientKey;

/// Shared handle to one visitor's bucket.
pub type BucketHandle = Arc<Mutex<TokenBucket>>;

/// Per-client state tracked by the registry.
struct VisitorEntry {
    /// The client's token bucket
    bucket: BucketHandle,
    /// Last time this client requested admission (admitted or denied)
    last_seen: Instant,
}

/// A concurrency-safe mapping from client key to visitor state.
///
/// Entries are created lazily on a client's first request and removed only
/// by the reaper once idle past the configured threshold. The map's sharded
/// locks cover structural changes (insert, evict); each visitor's bucket
/// carries its own mutex, so decisions for different clients never contend.
///
/// The shard guard is always released before a caller locks a bucket; no
/// code path holds both at once.
pub struct VisitorRegistry {
    visitors: DashMap<ClientKey, VisitorEntry>,
    /// Burst capacity for newly created buckets
    burst: u32,
    /// Time to regenerate one token
    refill_interval: Duration,
}

impl VisitorRegistry {
    /// Create an empty registry. New visitors get buckets with the given
    /// burst capacity and refill interval.
    pub fn new(burst: u32, refill_interval: Duration) -> Self {
        Self {
            visitors: DashMap::new(),
            burst,
            refill_interval,
        }
    }

    /// Look up the bucket for `key`, creating a full one on first sight,
    /// and refresh the visitor's `last_seen` timestamp.
    ///
    /// Get-or-create is atomic per key: two simultaneous first requests
    /// from the same unseen key resolve to a single bucket, so a client
    /// can never double its burst allowance by racing its own requests.
    pub fn get_or_create(&self, key: &ClientKey, now: Instant) -> BucketHandle {
        let mut entry = self
            .visitors
            .entry(key.clone())
            .or_insert_with(|| {
                debug!(
                    key = %key,
                    burst = self.burst,
                    "Creating visitor entry"
                );
                VisitorEntry {
                    bucket: Arc::new(Mutex::new(TokenBucket::new(
                        self.burst,
                        self.refill_interval,
                        now,
                    ))),
                    last_seen: now,
                }
            });

        entry.last_seen = now;
        entry.bucket.clone()
    }

    /// Remove every visitor idle longer than `idle_threshold`, returning
    /// the number evicted.
    ///
    /// Only liveness metadata is inspected; token state is untouched. A
    /// client that returns after eviction starts over with a full bucket.
    pub fn evict_idle(&self, idle_threshold: Duration, now: Instant) -> usize {
        let before = self.visitors.len();
        self.visitors
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_threshold);
        // Inserts may land during the sweep, so measure with saturation
        let evicted = before.saturating_sub(self.visitors.len());

        if evicted > 0 {
            trace!(evicted = evicted, remaining = self.visitors.len(), "Evicted idle visitors");
        }
        evicted
    }

    /// Number of visitors currently tracked.
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    /// Whether the registry is tracking any visitors.
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}
