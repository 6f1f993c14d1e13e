use crate::classifier::EnergyClassifier;
use crate::config::VadConfig;
use crate::energy::EnergyMeter;
use crate::{FrameClassifier, VadError};

/// Dual-gate VAD: a frame counts as speech only when the classifier accepts
/// it AND its RMS amplitude clears a fixed floor. The second gate excludes
/// quiet broadband noise the classifier alone would accept.
pub struct DualGateVad {
    classifier: Box<dyn FrameClassifier>,
    meter: EnergyMeter,
    rms_floor: f32,
}

impl DualGateVad {
    pub fn new(config: VadConfig) -> Self {
        let rms_floor = config.rms_floor;
        Self {
            classifier: Box::new(EnergyClassifier::new(config)),
            meter: EnergyMeter::new(),
            rms_floor,
        }
    }

    pub fn with_classifier(classifier: Box<dyn FrameClassifier>, rms_floor: f32) -> Self {
        Self {
            classifier,
            meter: EnergyMeter::new(),
            rms_floor,
        }
    }
}

impl FrameClassifier for DualGateVad {
    fn classify(&mut self, frame: &[i16]) -> Result<bool, VadError> {
        let candidate = self.classifier.classify(frame)?;
        Ok(candidate && self.meter.rms(frame) > self.rms_floor)
    }

    fn reset(&mut self) {
        self.classifier.reset();
    }

    fn required_sample_rate(&self) -> u32 {
        self.classifier.required_sample_rate()
    }

    fn required_frame_size(&self) -> usize {
        self.classifier.required_frame_size()
    }
}
