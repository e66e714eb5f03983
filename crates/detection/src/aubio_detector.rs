//! Delegation to the aubio tempo/pitch estimators.
//!
//! Requires libaubio at build time; compiled only with the `aubio-dsp`
//! feature. Any estimator error is downgraded to "no beat this frame" so
//! detection failure can never stop audio ingestion.

use aubio::{OnsetMode, Pitch, PitchMode, PitchUnit, Tempo};
use contracts::{AudioConfig, BeatDetector, ContractError, Detection};
use tracing::error;

/// Silence floor handed to the pitch estimator, in dB
const PITCH_SILENCE_DB: f32 = -40.0;

/// aubio-backed tempo and pitch detection
pub struct AubioDetector {
    tempo: Tempo,
    pitch: Pitch,
}

impl AubioDetector {
    /// Construct estimators sized to the configured analysis frame
    pub fn new(audio: &AudioConfig) -> Result<Self, ContractError> {
        let buf_size = audio.buffer_size;
        let hop_size = buf_size / 2;

        let tempo = Tempo::new(OnsetMode::SpecDiff, buf_size, hop_size, audio.sample_rate)
            .map_err(|e| ContractError::detection(format!("tempo init: {e}")))?;
        let pitch = Pitch::new(PitchMode::Yinfft, buf_size, hop_size, audio.sample_rate)
            .map_err(|e| ContractError::detection(format!("pitch init: {e}")))?
            .with_unit(PitchUnit::Hz)
            .with_silence(PITCH_SILENCE_DB);

        Ok(Self { tempo, pitch })
    }
}

impl BeatDetector for AubioDetector {
    fn name(&self) -> &'static str {
        "aubio"
    }

    fn process(&mut self, samples: &[f32], _sample_rate_hz: u32) -> Detection {
        let volume = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32
        };

        let is_beat = match self.tempo.do_result(samples) {
            Ok(result) => result > 0.0,
            Err(e) => {
                error!(error = %e, "aubio tempo error");
                return Detection::silent(volume);
            }
        };

        let pitch_hz = match self.pitch.do_result(samples) {
            Ok(hz) => hz,
            Err(e) => {
                error!(error = %e, "aubio pitch error");
                return Detection::silent(volume);
            }
        };

        Detection {
            is_beat,
            pitch_hz,
            volume,
        }
    }
}
