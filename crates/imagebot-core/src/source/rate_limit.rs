//! Minimum-spacing rate limiter for one upstream host.
//!
//! Wraps a direct (unkeyed) governor GCRA limiter whose quota replenishes
//! one cell per `min_interval` with a burst of 1, so two admitted requests
//! are never closer together than the interval. Waiting callers are queued
//! by governor itself; no lock is held across an await point.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::time::Duration;
use tokio::time::Instant;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Enforces a minimum interval between outbound requests to one host.
pub struct RateLimiter {
    min_interval: Duration,
    /// `None` when the interval is zero: every request departs immediately.
    limiter: Option<DirectRateLimiter>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        // with_period yields a burst of 1 and rejects a zero period.
        let limiter = Quota::with_period(min_interval).map(GovernorRateLimiter::direct);
        Self {
            min_interval,
            limiter,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until this caller may send, then return the departure instant.
    pub async fn await_turn(&self) -> Instant {
        if let Some(limiter) = &self.limiter {
            if limiter.check().is_err() {
                tracing::debug!("Rate limiter holding request ({:?} spacing)", self.min_interval);
                limiter.until_ready().await;
            }
        }
        Instant::now()
    }
}
