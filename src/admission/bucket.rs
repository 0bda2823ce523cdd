//! Token bucket implementation.

use std::time::{Duration, Instant};

/// A single client's token bucket with continuous refill.
///
/// Tokens accrue fractionally as time passes, at a rate of one token per
/// `refill_interval`, up to `capacity`. Each admitted request consumes one
/// whole token. A freshly created bucket starts full, so a new client may
/// burst up to `capacity` requests before throttling engages.
///
/// The bucket itself is not synchronized; callers hold it behind a
/// per-visitor `parking_lot::Mutex` so that [`try_consume`](Self::try_consume)
/// is linearizable per client.
#[derive(Debug)]
pub struct TokenBucket {
    /// Current token balance, `0.0..=capacity`
    tokens: f64,
    /// Maximum burst size
    capacity: u32,
    /// Time to regenerate one token
    refill_interval: Duration,
    /// When tokens were last accrued
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket.
    pub fn new(capacity: u32, refill_interval: Duration, now: Instant) -> Self {
        Self {
            tokens: capacity as f64,
            capacity,
            refill_interval,
            last_refill: now,
        }
    }

    /// Accrue tokens for the time elapsed since the last refill, then try
    /// to consume one.
    ///
    /// Returns `true` if a token was consumed (admit), `false` if the
    /// balance is below one (deny). A `now` earlier than the last refill
    /// observation accrues nothing; tokens are never subtracted by the
    /// refill step.
    pub fn try_consume(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill);
        let tokens_to_add = elapsed.as_secs_f64() / self.refill_interval.as_secs_f64();
        self.tokens = (self.tokens + tokens_to_add).min(self.capacity as f64);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current token balance.
    ///
    /// This does not accrue; it reflects the balance as of the last
    /// [`try_consume`](Self::try_consume) call.
    pub fn available_tokens(&self) -> f64 {
        self.tokens
    }

    /// The bucket's maximum burst size.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: Duration = Duration::from_secs(1);

    #[test]
    fn test_new_bucket_starts_full() {
        let bucket = TokenBucket::new(5, RATE, Instant::now());

        assert_eq!(bucket.available_tokens(), 5.0);
        assert_eq!(bucket.capacity(), 5);
    }

    #[test]
    fn test_burst_then_deny() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(5, RATE, now);

        for _ in 0..5 {
            assert!(bucket.try_consume(now));
        }

        // 6th request at the same instant is denied
        assert!(!bucket.try_consume(now));
        assert!(bucket.available_tokens() < 1.0);
    }

    #[test]
    fn test_refill_one_token_after_one_interval() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(5, RATE, now);

        for _ in 0..5 {
            assert!(bucket.try_consume(now));
        }
        assert!(!bucket.try_consume(now));

        // Exactly one interval later, exactly one token has accrued
        let later = now + RATE;
        assert!(bucket.try_consume(later));
        assert!(!bucket.try_consume(later));
    }

    #[test]
    fn test_fractional_accrual() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(2, RATE, now);

        assert!(bucket.try_consume(now));
        assert!(bucket.try_consume(now));

        // Half an interval accrues half a token, not enough to admit
        assert!(!bucket.try_consume(now + Duration::from_millis(500)));

        // The remaining half arrives by the full interval mark
        assert!(bucket.try_consume(now + RATE));
    }

    #[test]
    fn test_refill_clamped_to_capacity() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(3, RATE, now);

        assert!(bucket.try_consume(now));

        // A long idle period refills to capacity, never beyond
        let later = now + Duration::from_secs(3600);
        assert!(bucket.try_consume(later));
        assert_eq!(bucket.available_tokens(), 2.0);
    }

    #[test]
    fn test_backward_clock_accrues_nothing() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(5, RATE, now + Duration::from_secs(10));

        for _ in 0..5 {
            assert!(bucket.try_consume(now + Duration::from_secs(10)));
        }

        // An observation earlier than last_refill clamps elapsed to zero
        assert!(!bucket.try_consume(now));
        assert!(bucket.available_tokens() >= 0.0);
    }

    #[test]
    fn test_tokens_stay_within_bounds() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(4, RATE, now);

        for i in 0..20u64 {
            bucket.try_consume(now + Duration::from_millis(i * 300));
            assert!(bucket.available_tokens() >= 0.0);
            assert!(bucket.available_tokens() <= 4.0);
        }
    }
}
