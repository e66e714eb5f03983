//! Engine counters, shared lock-free with the status surface.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Live dispatch counters
#[derive(Debug, Default)]
pub struct EngineStats {
    beats_handled: AtomicU64,
    messages_sent: AtomicU64,
    flash_offs: AtomicU64,
    /// Bits of an f32, the dominant frequency of the last beat
    current_frequency: AtomicU32,
    /// Unix seconds of the last beat, zero before the first one
    last_beat_unix: AtomicU64,
}

/// Point-in-time copy of [`EngineStats`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineStatsSnapshot {
    pub beats_handled: u64,
    pub messages_sent: u64,
    pub flash_offs: u64,
    pub current_frequency: f32,
    pub last_beat_unix: u64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_beat(&self, frequency_hz: f32) {
        self.beats_handled.fetch_add(1, Ordering::Relaxed);
        self.current_frequency
            .store(frequency_hz.to_bits(), Ordering::Relaxed);
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_beat_unix.store(now, Ordering::Relaxed);
    }

    pub fn record_message(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_flash_off(&self) {
        self.flash_offs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            beats_handled: self.beats_handled.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            flash_offs: self.flash_offs.load(Ordering::Relaxed),
            current_frequency: f32::from_bits(self.current_frequency.load(Ordering::Relaxed)),
            last_beat_unix: self.last_beat_unix.load(Ordering::Relaxed),
        }
    }
}
