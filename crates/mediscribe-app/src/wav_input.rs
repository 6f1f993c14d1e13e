use std::path::Path;

use anyhow::{bail, Context};

/// Loads a WAV file as mono i16 samples plus its native sample rate.
/// Multi-channel files are averaged down to mono.
pub fn load_wav(path: &Path) -> anyhow::Result<(u32, Vec<i16>)> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open WAV file {}", path.display()))?;
    let spec = reader.spec();

    let interleaved: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if spec.bits_per_sample != 16 {
                bail!(
                    "unsupported bit depth {} (expected 16-bit PCM)",
                    spec.bits_per_sample
                );
            }
            reader
                .samples::<i16>()
                .collect::<Result<_, _>>()
                .context("failed to decode PCM samples")?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()
            .context("failed to decode float samples")?,
    };

    let channels = spec.channels.max(1) as usize;
    let mono = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    };

    Ok((spec.sample_rate, mono))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn write_wav(path: &Path, channels: u16, samples: &[i16]) {
        let spec = WavSpec {
            channels,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn loads_mono_pcm() {
        let dir = std::env::temp_dir().join("mediscribe-wav-mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mono.wav");
        write_wav(&path, 1, &[1, -2, 3, -4]);

        let (rate, samples) = load_wav(&path).unwrap();
        assert_eq!(rate, 16_000);
        assert_eq!(samples, vec![1, -2, 3, -4]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn stereo_averages_to_mono() {
        let dir = std::env::temp_dir().join("mediscribe-wav-stereo");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stereo.wav");
        write_wav(&path, 2, &[1000, -1000, 600, 400]);

        let (_, samples) = load_wav(&path).unwrap();
        assert_eq!(samples, vec![0, 500]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_wav(Path::new("/nonexistent/input.wav")).is_err());
    }
}
