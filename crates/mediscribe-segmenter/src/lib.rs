//! Streaming speech segmentation.
//!
//! Converts an arbitrary-rate, arbitrarily chunked PCM stream into discrete
//! silence-delimited utterances ready for transcription.

pub mod segmenter;

pub use segmenter::{SegmenterConfig, SpeechSegmenter, Utterance};

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("sample rate must be a positive integer")]
    InvalidSampleRate,
}

static UTTERANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique utterance ID.
pub fn next_utterance_id() -> u64 {
    UTTERANCE_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
