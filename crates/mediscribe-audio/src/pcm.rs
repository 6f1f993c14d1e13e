//! PCM16LE byte packing helpers shared by the segmenter and WAV encoding.

pub const BYTES_PER_SAMPLE: usize = 2;

pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    for &s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Decodes little-endian PCM16 bytes. A trailing odd byte is ignored;
/// callers slice on frame boundaries so it never occurs in practice.
pub fn bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
