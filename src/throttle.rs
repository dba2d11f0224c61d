//! Minimum-interval throttle gate for scroll/resize notifications.
//!
//! Scroll and resize events arrive far faster than revalidation needs to
//! run. The gate bounds handler frequency by dropping calls that arrive
//! inside the minimum interval — dropped, not queued: there is no trailing
//! edge, the next qualifying call after the interval simply passes.

use std::time::{Duration, Instant};

/// A gate that passes at most one call per `min_interval`.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    last_pass: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_pass: None,
        }
    }

    /// Whether a call at `now` passes the gate. A passing call arms the
    /// gate; calls within `min_interval` of the last pass are dropped.
    ///
    /// The first call after construction or [`reset`](Self::reset) always
    /// passes.
    pub fn allow(&mut self, now: Instant) -> bool {
        if self
            .last_pass
            .is_some_and(|last| now.duration_since(last) < self.min_interval)
        {
            return false;
        }
        self.last_pass = Some(now);
        true
    }

    /// Disarm the gate so the next call passes unconditionally.
    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}
