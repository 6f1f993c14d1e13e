use crate::config::VadConfig;
use crate::energy::EnergyMeter;
use crate::{FrameClassifier, VadError};

/// Energy classifier with an adaptive noise floor.
///
/// A frame is speech when its dBFS level exceeds the tracked floor by the
/// aggressiveness margin. The floor follows non-speech frames with an EMA,
/// so a drifting room tone does not become permanent "speech".
pub struct EnergyClassifier {
    config: VadConfig,
    meter: EnergyMeter,
    noise_floor_db: f32,
}

impl EnergyClassifier {
    pub fn new(config: VadConfig) -> Self {
        Self {
            noise_floor_db: config.initial_floor_db,
            meter: EnergyMeter::new(),
            config,
        }
    }

    pub fn noise_floor_db(&self) -> f32 {
        self.noise_floor_db
    }
}

impl FrameClassifier for EnergyClassifier {
    fn classify(&mut self, frame: &[i16]) -> Result<bool, VadError> {
        if frame.len() != self.config.frame_size_samples {
            return Err(VadError::FrameSize {
                expected: self.config.frame_size_samples,
                got: frame.len(),
            });
        }

        let energy_db = self.meter.dbfs(frame);
        let is_speech =
            energy_db > self.noise_floor_db + self.config.aggressiveness.onset_margin_db();

        if !is_speech {
            let alpha = self.config.ema_alpha;
            self.noise_floor_db = (1.0 - alpha) * self.noise_floor_db + alpha * energy_db;
        }

        Ok(is_speech)
    }

    fn reset(&mut self) {
        self.noise_floor_db = self.config.initial_floor_db;
    }

    fn required_sample_rate(&self) -> u32 {
        self.config.sample_rate_hz
    }

    fn required_frame_size(&self) -> usize {
        self.config.frame_size_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FRAME_SIZE_SAMPLES;

    fn tone(amplitude: f32) -> Vec<i16> {
        (0..FRAME_SIZE_SAMPLES)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * 440.0 * i as f32 / 16000.0;
                (phase.sin() * amplitude) as i16
            })
            .collect()
    }

    #[test]
    fn wrong_frame_size_is_an_error() {
        let mut vad = EnergyClassifier::new(VadConfig::default());
        let err = vad.classify(&vec![0i16; 160]).unwrap_err();
        assert_eq!(
            err,
            VadError::FrameSize {
                expected: FRAME_SIZE_SAMPLES,
                got: 160
            }
        );
    }

    #[test]
    fn silence_is_not_speech() {
        let mut vad = EnergyClassifier::new(VadConfig::default());
        let silence = vec![0i16; FRAME_SIZE_SAMPLES];
        for _ in 0..50 {
            assert!(!vad.classify(&silence).unwrap());
        }
    }

    #[test]
    fn loud_tone_is_speech() {
        let mut vad = EnergyClassifier::new(VadConfig::default());
        assert!(vad.classify(&tone(8000.0)).unwrap());
    }

    #[test]
    fn floor_adapts_to_background_noise() {
        use rand::Rng;
        let mut vad = EnergyClassifier::new(VadConfig {
            ema_alpha: 0.1,
            ..Default::default()
        });
        let mut rng = rand::thread_rng();
        let noise: Vec<i16> = (0..FRAME_SIZE_SAMPLES)
            .map(|_| ((rng.gen::<f32>() - 0.5) * 200.0) as i16)
            .collect();

        let initial = vad.noise_floor_db();
        for _ in 0..50 {
            vad.classify(&noise).unwrap();
        }
        assert_ne!(initial, vad.noise_floor_db());
    }

    #[test]
    fn reset_restores_initial_floor() {
        let cfg = VadConfig::default();
        let initial = cfg.initial_floor_db;
        let mut vad = EnergyClassifier::new(cfg);
        let quiet = vec![50i16; FRAME_SIZE_SAMPLES];
        for _ in 0..20 {
            vad.classify(&quiet).unwrap();
        }
        vad.reset();
        assert_eq!(vad.noise_floor_db(), initial);
    }
}
