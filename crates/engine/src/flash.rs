//! Flash lifetime tracking.
//!
//! A flash is armed when a flash-mode device lights up and expires once it
//! has been on strictly longer than the configured duration. The sweep and
//! a concurrent re-arm can race; `disarm_if_unchanged` resolves that race
//! by only turning off the exact flash generation the sweep observed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// One armed or expired flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashEntry {
    pub started_at: Instant,
    pub is_on: bool,
}

/// Per-device flash state
#[derive(Debug, Default)]
pub struct FlashTracker {
    entries: Mutex<HashMap<String, FlashEntry>>,
}

impl FlashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `device_id` lit up at `now`
    pub fn arm(&self, device_id: &str, now: Instant) {
        self.entries.lock().insert(
            device_id.to_owned(),
            FlashEntry {
                started_at: now,
                is_on: true,
            },
        );
    }

    /// Devices whose flash has outlived `lifetime` as of `now`
    ///
    /// Returns the `started_at` seen for each entry so the caller can pass
    /// it back to [`FlashTracker::disarm_if_unchanged`].
    pub fn expired(&self, now: Instant, lifetime: Duration) -> Vec<(String, Instant)> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, entry)| {
                entry.is_on && now.saturating_duration_since(entry.started_at) > lifetime
            })
            .map(|(id, entry)| (id.clone(), entry.started_at))
            .collect()
    }

    /// Mark the flash off, but only if it has not been re-armed since
    /// `started_at` was observed. Returns whether the disarm took effect.
    pub fn disarm_if_unchanged(&self, device_id: &str, started_at: Instant) -> bool {
        let mut entries = self.entries.lock();
        match entries.get_mut(device_id) {
            Some(entry) if entry.is_on && entry.started_at == started_at => {
                entry.is_on = false;
                true
            }
            _ => false,
        }
    }

    /// Drop the state for a removed device
    pub fn forget(&self, device_id: &str) {
        self.entries.lock().remove(device_id);
    }

    /// Current entry for a device, if any
    pub fn get(&self, device_id: &str) -> Option<FlashEntry> {
        self.entries.lock().get(device_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIFETIME: Duration = Duration::from_millis(300);

    #[test]
    fn test_expiry_is_strictly_greater() {
        let tracker = FlashTracker::new();
        let t0 = Instant::now();
        tracker.arm("d1", t0);

        // Exactly at the lifetime the flash is still alive.
        assert!(tracker.expired(t0 + LIFETIME, LIFETIME).is_empty());
        let expired = tracker.expired(t0 + LIFETIME + Duration::from_millis(10), LIFETIME);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].0, "d1");
    }

    #[test]
    fn test_disarmed_flash_not_swept_again() {
        let tracker = FlashTracker::new();
        let t0 = Instant::now();
        tracker.arm("d1", t0);

        let later = t0 + Duration::from_millis(400);
        let (id, started_at) = tracker.expired(later, LIFETIME).remove(0);
        assert!(tracker.disarm_if_unchanged(&id, started_at));
        assert!(tracker.expired(later, LIFETIME).is_empty());
        assert!(!tracker.get("d1").unwrap().is_on);
    }

    #[test]
    fn test_rearm_wins_over_stale_disarm() {
        let tracker = FlashTracker::new();
        let t0 = Instant::now();
        tracker.arm("d1", t0);

        let (id, stale_start) = tracker
            .expired(t0 + Duration::from_millis(400), LIFETIME)
            .remove(0);

        // A new beat re-arms before the sweep completes.
        let t1 = t0 + Duration::from_millis(350);
        tracker.arm("d1", t1);

        assert!(!tracker.disarm_if_unchanged(&id, stale_start));
        assert!(tracker.get("d1").unwrap().is_on);
        assert_eq!(tracker.get("d1").unwrap().started_at, t1);
    }
}
