use serde::{Deserialize, Serialize};

use super::constants::{FRAME_SIZE_SAMPLES, SAMPLE_RATE_HZ};

/// Classifier strictness. Higher levels demand a larger margin above the
/// tracked noise floor before a frame counts as speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggressiveness {
    Permissive,
    Low,
    Medium,
    High,
}

impl Default for Aggressiveness {
    fn default() -> Self {
        Self::Low
    }
}

impl Aggressiveness {
    /// dB margin above the noise floor required to call a frame speech.
    pub fn onset_margin_db(self) -> f32 {
        match self {
            Aggressiveness::Permissive => 6.0,
            Aggressiveness::Low => 9.0,
            Aggressiveness::Medium => 12.0,
            Aggressiveness::High => 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VadConfig {
    pub aggressiveness: Aggressiveness,
    pub frame_size_samples: usize,
    pub sample_rate_hz: u32,
    /// Minimum RMS (full scale = 1.0) for the energy gate. Calibrated so
    /// noise-floor frames fail even when the classifier accepts them.
    pub rms_floor: f32,
    /// Starting noise floor estimate (dBFS) before any audio is seen.
    pub initial_floor_db: f32,
    /// EMA coefficient for noise floor adaptation during non-speech.
    pub ema_alpha: f32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            aggressiveness: Aggressiveness::default(),
            frame_size_samples: FRAME_SIZE_SAMPLES,
            sample_rate_hz: SAMPLE_RATE_HZ,
            rms_floor: 400.0 / 32768.0,
            initial_floor_db: -50.0,
            ema_alpha: 0.02,
        }
    }
}

impl VadConfig {
    pub fn frame_duration_ms(&self) -> f32 {
        (self.frame_size_samples as f32 * 1000.0) / self.sample_rate_hz as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame_duration_is_30ms() {
        let cfg = VadConfig::default();
        assert!((cfg.frame_duration_ms() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn margins_increase_with_aggressiveness() {
        let mut prev = 0.0;
        for level in [
            Aggressiveness::Permissive,
            Aggressiveness::Low,
            Aggressiveness::Medium,
            Aggressiveness::High,
        ] {
            assert!(level.onset_margin_db() > prev);
            prev = level.onset_margin_db();
        }
    }
}
