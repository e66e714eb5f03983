//! Beat events and detector output.

use std::time::Instant;

/// Result of analysing one audio frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// A rhythmic pulse was detected in this frame
    pub is_beat: bool,

    /// Dominant pitch in Hz; 0.0 means no reliable pitch
    pub pitch_hz: f32,

    /// Mean squared amplitude of the frame
    pub volume: f32,
}

impl Detection {
    /// The "nothing usable this frame" result, used when detection fails
    pub fn silent(volume: f32) -> Self {
        Self {
            is_beat: false,
            pitch_hz: 0.0,
            volume,
        }
    }
}

/// A single qualifying beat, produced once and consumed immediately
#[derive(Debug, Clone, Copy)]
pub struct BeatEvent {
    /// Monotonic time of detection; rate limits and flash ages are measured
    /// against this, not against wall-clock
    pub at: Instant,

    /// Dominant pitch in Hz, always > 0 for a qualifying event
    pub frequency_hz: f32,

    /// Frame volume, already above the silence gate
    pub volume: f32,
}
