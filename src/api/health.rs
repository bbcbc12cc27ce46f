//! Shared health state for the /health endpoint.
//! Updated by the price and report handlers on every poll.

use std::sync::atomic::{AtomicU64, Ordering};

/// Poll counters. Handlers record, /health reads.
#[derive(Default)]
pub struct HealthState {
    /// Successful store reads served to dashboard polls.
    pub polls_served: AtomicU64,
    /// Polls whose store read failed (missing or malformed file).
    pub poll_errors: AtomicU64,
    /// Millisecond timestamp of the last poll (0 = none).
    pub last_poll_at_ms: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_poll(&self, ok: bool, now_ms: u64) {
        if ok {
            self.polls_served.fetch_add(1, Ordering::Relaxed);
        } else {
            self.poll_errors.fetch_add(1, Ordering::Relaxed);
        }
        self.last_poll_at_ms.store(now_ms, Ordering::Relaxed);
    }

    pub fn polls_served(&self) -> u64 {
        self.polls_served.load(Ordering::Relaxed)
    }

    pub fn poll_errors(&self) -> u64 {
        self.poll_errors.load(Ordering::Relaxed)
    }

    pub fn last_poll_at_ms(&self) -> u64 {
        self.last_poll_at_ms.load(Ordering::Relaxed)
    }
}
