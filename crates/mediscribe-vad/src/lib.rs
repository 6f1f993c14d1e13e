pub mod classifier;
pub mod config;
pub mod constants;
pub mod dual_gate;
pub mod energy;

pub use classifier::EnergyClassifier;
pub use config::{Aggressiveness, VadConfig};
pub use constants::{FRAME_DURATION_MS, FRAME_SIZE_BYTES, FRAME_SIZE_SAMPLES, SAMPLE_RATE_HZ};
pub use dual_gate::DualGateVad;
pub use energy::EnergyMeter;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VadError {
    #[error("expected {expected} samples per frame, got {got}")]
    FrameSize { expected: usize, got: usize },
}

/// Per-frame binary speech classification.
///
/// Implementations are stateful (noise-floor tracking) and therefore take
/// `&mut self`; the caller owns exactly one classifier per audio session.
pub trait FrameClassifier: Send {
    fn classify(&mut self, frame: &[i16]) -> Result<bool, VadError>;
    fn reset(&mut self);
    fn required_sample_rate(&self) -> u32;
    fn required_frame_size(&self) -> usize;
}
