//! Shared rate-limit state and proactive request pacing.
//!
//! The tracker is advisory, last-write-wins data: any component may publish
//! a fresher snapshot (including one taken from a failed response), readers
//! never block on its absence, and a stale or missing value must never halt
//! the pipeline.

use std::num::NonZeroU32;
use std::sync::{Arc, RwLock};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::github::types::RateLimitSnapshot;

/// Type alias for the governor rate limiter.
type GovernorRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// GitHub allows 5000 requests/hour authenticated (~1.4/sec); 10/sec leaves
/// room for bursts without tripping secondary limits.
pub const GITHUB_DEFAULT_RPS: u32 = 10;

/// Last-known rate-limit snapshot, shared across the client and any
/// observers.
#[derive(Clone, Default)]
pub struct RateLimitTracker {
    inner: Arc<RwLock<Option<RateLimitSnapshot>>>,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresher snapshot. Last write wins.
    pub fn publish(&self, snapshot: RateLimitSnapshot) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot);
    }

    /// Get the most recently published snapshot, if any.
    #[must_use]
    pub fn latest(&self) -> Option<RateLimitSnapshot> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// A standalone proactive request pacer using the governor crate.
///
/// Distinct from the reactive low-quota cooldown in the collector: the pacer
/// spreads requests out ahead of time, the cooldown reacts to a nearly
/// exhausted window.
#[derive(Clone)]
pub struct ApiRateLimiter {
    inner: Arc<GovernorRateLimiter>,
}

impl ApiRateLimiter {
    /// Create a new pacer with the specified requests per second
    /// (a zero value falls back to 1).
    pub fn new(requests_per_second: u32) -> Self {
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::new(1).unwrap());
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));

        Self {
            inner: Arc::new(rate_limiter),
        }
    }

    /// Wait until the pacer allows another request.
    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(remaining: u32) -> RateLimitSnapshot {
        RateLimitSnapshot {
            limit: 5000,
            remaining,
            reset: 1_700_000_000,
            used: 5000 - remaining,
            resource: "core".to_string(),
        }
    }

    #[test]
    fn tracker_starts_empty() {
        let tracker = RateLimitTracker::new();
        assert!(tracker.latest().is_none());
    }

    #[test]
    fn tracker_last_write_wins() {
        let tracker = RateLimitTracker::new();
        tracker.publish(snapshot(4000));
        tracker.publish(snapshot(0));

        let latest = tracker.latest().expect("snapshot");
        assert_eq!(latest.remaining, 0);
    }

    #[test]
    fn tracker_clones_share_state() {
        let tracker = RateLimitTracker::new();
        let observer = tracker.clone();
        tracker.publish(snapshot(123));
        assert_eq!(observer.latest().expect("snapshot").remaining, 123);
    }

    #[tokio::test]
    async fn limiter_allows_a_first_request_immediately() {
        let limiter = ApiRateLimiter::new(10);
        // Must not hang.
        limiter.wait().await;
    }

    #[test]
    fn limiter_zero_rps_falls_back_to_one() {
        // Construction must not panic.
        let _ = ApiRateLimiter::new(0);
    }
}
