//! Per-device publish rate limiting.
//!
//! The check and the timestamp update happen atomically under one lock, so
//! two concurrent dispatch tasks for the same device can never both pass
//! within one interval.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Tracks the last accepted publish per device id
#[derive(Debug, Default)]
pub struct RateLimiter {
    last_publish: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a publish slot for `device_id` at `now`.
    ///
    /// Returns false if a publish was already accepted within
    /// `min_interval`; otherwise records `now` and returns true. A device
    /// with no history always passes.
    pub fn try_acquire(&self, device_id: &str, now: Instant, min_interval: Duration) -> bool {
        let mut last = self.last_publish.lock();
        if let Some(&previous) = last.get(device_id) {
            if now.saturating_duration_since(previous) < min_interval {
                return false;
            }
        }
        last.insert(device_id.to_owned(), now);
        true
    }

    /// Drop the history for a removed device
    pub fn forget(&self, device_id: &str) {
        self.last_publish.lock().remove(device_id);
    }
}
