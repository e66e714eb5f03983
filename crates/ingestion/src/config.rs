//! Ingestion metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Total frames analysed
    pub frames_analysed: AtomicU64,

    /// Frames discarded by the silence gate
    pub silent_frames: AtomicU64,

    /// Qualifying beat events emitted to the channel
    pub beats_emitted: AtomicU64,

    /// Beat events dropped because the channel was full
    pub events_dropped: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame analysed
    pub fn record_frame(&self) {
        self.frames_analysed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame below the silence gate
    pub fn record_silent(&self) {
        self.silent_frames.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a beat event sent downstream
    pub fn record_beat(&self) {
        self.beats_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a beat event dropped on saturation
    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_analysed: self.frames_analysed.load(Ordering::Relaxed),
            silent_frames: self.silent_frames.load(Ordering::Relaxed),
            beats_emitted: self.beats_emitted.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub frames_analysed: u64,
    pub silent_frames: u64,
    pub beats_emitted: u64,
    pub events_dropped: u64,
}
