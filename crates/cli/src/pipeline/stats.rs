//! Pipeline run statistics.

use std::time::Duration;

use engine::EngineStatsSnapshot;
use ingestion::MetricsSnapshot;
use observability::BeatSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Total duration of the run
    pub duration: Duration,

    /// Ingestion counters (frames, silence, emitted/dropped events)
    pub ingestion: MetricsSnapshot,

    /// Engine counters (beats handled, publishes, flash offs)
    pub engine: EngineStatsSnapshot,

    /// Frequency/volume distribution of the handled beats
    pub beats: BeatSummary,

    /// Configured devices at startup
    pub device_count: usize,
}

impl PipelineStats {
    /// Beats handled per second over the whole run
    pub fn beats_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.engine.beats_handled as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===");
        println!("Duration: {:.2}s", self.duration.as_secs_f64());
        println!("Devices: {}", self.device_count);
        println!("Frames analysed: {}", self.ingestion.frames_analysed);
        println!("Silent frames: {}", self.ingestion.silent_frames);
        println!(
            "Beat events: {} emitted, {} dropped",
            self.ingestion.beats_emitted, self.ingestion.events_dropped
        );
        println!(
            "Beats handled: {} ({:.2}/s)",
            self.engine.beats_handled,
            self.beats_per_second()
        );
        println!("Commands published: {}", self.engine.messages_sent);
        println!("Flash offs: {}", self.engine.flash_offs);
        println!();
        print!("{}", self.beats);
        println!();
    }
}
