//! Per-client admission control: token buckets, the visitor registry,
//! background eviction, and the request gate.

mod bucket;
mod gate;
mod key;
mod limiter;
mod reaper;
mod registry;

pub use bucket::TokenBucket;
pub use gate::{Decision, DenyBody, Gate, DENY_MESSAGE};
pub use key::ClientKey;
pub use limiter::Limiter;
pub use reaper::{Reaper, ReaperHandle};
pub use registry::{BucketHandle, VisitorRegistry};
