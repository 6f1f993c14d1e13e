//! Speech-to-text abstraction layer.
//!
//! The segmenter hands completed utterances to a [`Transcriber`]; the
//! production implementation posts them to a Whisper-compatible remote
//! endpoint, the mock replays a script for tests.

pub mod mock;
pub mod remote;
pub mod wav;

pub use mock::MockTranscriber;
pub use remote::RemoteWhisperTranscriber;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SttError {
    #[error("transcription disabled: {0}")]
    Disabled(String),

    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected transcription response: {0}")]
    Response(String),

    #[error("failed to encode utterance: {0}")]
    Encode(String),
}

/// Opaque remote transcription call.
///
/// Implementations take the raw utterance bytes (PCM16LE at the pipeline's
/// target rate) and return plain text. Failures are surfaced to the caller,
/// which substitutes an error marker and keeps the session alive.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, pcm: &[u8]) -> Result<String, SttError>;
}
