use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Streaming resampler for mono i16 audio built on Rubato's sinc
/// interpolation.
///
/// - Accepts arbitrary-sized input chunks and buffers internally to satisfy
///   Rubato's fixed input-chunk requirement
/// - Output depends only on the cumulative input stream, never on how the
///   caller chunked it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplerQuality {
    Fast,
    Balanced,
    Quality,
}

pub struct StreamResampler {
    in_rate: u32,
    out_rate: u32,
    resampler: SincFixedIn<f32>,
    input_buffer: Vec<f32>,
    output_buffer: Vec<f32>,
    chunk_size: usize,
}

impl StreamResampler {
    pub fn new(in_rate: u32, out_rate: u32) -> Self {
        Self::new_with_quality(in_rate, out_rate, ResamplerQuality::Balanced)
    }

    pub fn new_with_quality(in_rate: u32, out_rate: u32, quality: ResamplerQuality) -> Self {
        // Small chunks keep segmentation latency low: 480 samples is one
        // 30 ms frame at the 16 kHz target rate.
        let chunk_size = 480;

        let sinc_params = match quality {
            ResamplerQuality::Fast => SincInterpolationParameters {
                sinc_len: 32,
                f_cutoff: 0.92,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 64,
                window: WindowFunction::Blackman,
            },
            ResamplerQuality::Balanced => SincInterpolationParameters {
                sinc_len: 64,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 128,
                window: WindowFunction::Blackman2,
            },
            ResamplerQuality::Quality => SincInterpolationParameters {
                sinc_len: 128,
                f_cutoff: 0.97,
                interpolation: SincInterpolationType::Cubic,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            },
        };

        let resampler = SincFixedIn::<f32>::new(
            out_rate as f64 / in_rate as f64,
            2.0,
            sinc_params,
            chunk_size,
            1,
        )
        .expect("sinc resampler construction cannot fail for positive rates");

        Self {
            in_rate,
            out_rate,
            resampler,
            input_buffer: Vec::with_capacity(chunk_size * 2),
            output_buffer: Vec::new(),
            chunk_size,
        }
    }

    /// Process an arbitrary chunk of mono i16 samples, returning whatever
    /// resampled output is available so far at the target rate.
    pub fn process(&mut self, input: &[i16]) -> Vec<i16> {
        if self.in_rate == self.out_rate {
            return input.to_vec();
        }

        for &sample in input {
            self.input_buffer.push(sample as f32 / 32768.0);
        }

        while self.input_buffer.len() >= self.chunk_size {
            let chunk: Vec<f32> = self.input_buffer.drain(..self.chunk_size).collect();
            let input_frames = vec![chunk];

            let output_frames = match self.resampler.process(&input_frames, None) {
                Ok(frames) => frames,
                Err(e) => {
                    tracing::warn!(error = %e, "resampler error, dropping chunk");
                    continue;
                }
            };

            if let Some(channel) = output_frames.first() {
                self.output_buffer.extend_from_slice(channel);
            }
        }

        let mut result = Vec::with_capacity(self.output_buffer.len());
        for &sample in &self.output_buffer {
            let clamped = sample.clamp(-1.0, 1.0);
            result.push((clamped * 32767.0).round() as i16);
        }
        self.output_buffer.clear();
        result
    }

    pub fn reset(&mut self) {
        self.input_buffer.clear();
        self.output_buffer.clear();
        self.resampler.reset();
    }

    pub fn input_rate(&self) -> u32 {
        self.in_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.out_rate
    }
}
