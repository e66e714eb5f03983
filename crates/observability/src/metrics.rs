//! Dispatch metric helpers and in-memory aggregation.

use metrics::{counter, gauge, histogram};

/// Record one handled beat
pub fn record_beat(frequency_hz: f32, volume: f32) {
    counter!("beatglow_beats_handled_total").increment(1);
    gauge!("beatglow_beat_frequency_hz").set(frequency_hz as f64);
    histogram!("beatglow_beat_frequency_hz_hist").record(frequency_hz as f64);
    histogram!("beatglow_beat_volume_hist").record(volume as f64);
}

/// Record a device command publish attempt
pub fn record_publish(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "beatglow_publishes_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a flash that was swept off
pub fn record_flash_off() {
    counter!("beatglow_flash_offs_total").increment(1);
}

/// Record a device skipped before publish
pub fn record_dispatch_skip(reason: &'static str) {
    counter!("beatglow_dispatch_skips_total", "reason" => reason).increment(1);
}

/// In-memory beat statistics, for the end-of-run summary
#[derive(Debug, Clone, Default)]
pub struct BeatAggregator {
    pub total_beats: u64,
    pub frequency_stats: RunningStats,
    pub volume_stats: RunningStats,
}

impl BeatAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, frequency_hz: f32, volume: f32) {
        self.total_beats += 1;
        self.frequency_stats.push(frequency_hz as f64);
        self.volume_stats.push(volume as f64);
    }

    pub fn summary(&self) -> BeatSummary {
        BeatSummary {
            total_beats: self.total_beats,
            frequency_hz: self.frequency_stats.clone(),
            volume: self.volume_stats.clone(),
        }
    }
}

/// Aggregated beat summary
#[derive(Debug, Clone, Default)]
pub struct BeatSummary {
    pub total_beats: u64,
    pub frequency_hz: RunningStats,
    pub volume: RunningStats,
}

impl std::fmt::Display for BeatSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Beat Summary ===")?;
        writeln!(f, "Total beats: {}", self.total_beats)?;
        writeln!(f, "Frequency (Hz): {}", self.frequency_hz)?;
        writeln!(f, "Volume: {}", self.volume)?;
        Ok(())
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl std::fmt::Display for RunningStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min,
                self.max,
                self.mean(),
                self.std_dev(),
                self.count
            )
        }
    }
}
