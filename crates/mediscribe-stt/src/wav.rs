use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use mediscribe_audio::bytes_to_samples;

use crate::SttError;

/// Wrap raw PCM16LE bytes in an in-memory mono WAV container, the shape the
/// remote transcription endpoint expects.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate_hz: u32) -> Result<Vec<u8>, SttError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec)
            .map_err(|e| SttError::Encode(e.to_string()))?;
        for sample in bytes_to_samples(pcm) {
            writer
                .write_sample(sample)
                .map_err(|e| SttError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| SttError::Encode(e.to_string()))?;
    }
    Ok(buffer)
}
