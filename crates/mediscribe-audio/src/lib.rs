pub mod pcm;
pub mod resampler;

pub use pcm::{bytes_to_samples, samples_to_bytes};
pub use resampler::{ResamplerQuality, StreamResampler};
