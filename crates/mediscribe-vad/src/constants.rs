//! Audio constants shared across the segmentation pipeline.

/// Target sample rate for all frame classification (Hz).
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Fixed frame duration (ms).
pub const FRAME_DURATION_MS: u32 = 30;

/// Samples per frame: 16 kHz * 30 ms = 480.
pub const FRAME_SIZE_SAMPLES: usize = (SAMPLE_RATE_HZ as usize * FRAME_DURATION_MS as usize) / 1000;

/// PCM16LE bytes per frame.
pub const FRAME_SIZE_BYTES: usize = FRAME_SIZE_SAMPLES * 2;
