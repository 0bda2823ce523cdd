//! Turnstile - Per-Client Admission Control
//!
//! This crate implements token-bucket rate limiting keyed by client
//! identifier, for embedding in a network-facing service. Each client gets
//! its own bucket that refills continuously; a background reaper evicts
//! idle clients to bound memory. State is local to one process.
//!
//! The host calls [`admission::Limiter::start`] once at startup and
//! [`admission::Limiter::decide`] once per inbound request before
//! dispatching to the protected handler. On [`admission::Decision::Deny`]
//! the host responds with a "too many requests" status and the
//! [`admission::DenyBody`] payload.

pub mod admission;
pub mod config;
pub mod error;

pub use admission::{ClientKey, Decision, Limiter};
pub use config::LimiterConfig;
pub use error::{Result, TurnstileError};
