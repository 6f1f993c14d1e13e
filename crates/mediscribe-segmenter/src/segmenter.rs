use std::collections::VecDeque;

use mediscribe_audio::{bytes_to_samples, samples_to_bytes, StreamResampler};
use mediscribe_telemetry::PipelineMetrics;
use mediscribe_vad::{DualGateVad, FrameClassifier, VadConfig, SAMPLE_RATE_HZ};

use crate::{next_utterance_id, SegmentError};

/// One completed silence-delimited span of audio, PCM16LE at the target
/// rate, including the trailing frames accumulated during the debounce
/// window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub id: u64,
    pub audio: Vec<u8>,
}

impl Utterance {
    pub fn duration_ms(&self, sample_rate_hz: u32) -> u64 {
        let samples = (self.audio.len() / 2) as u64;
        samples * 1000 / sample_rate_hz as u64
    }
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    pub target_sample_rate_hz: u32,
    /// Silence required after speech before the utterance closes.
    pub silence_duration_s: f32,
    pub vad: VadConfig,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_sample_rate_hz: SAMPLE_RATE_HZ,
            silence_duration_s: 0.5,
            vad: VadConfig::default(),
        }
    }
}

impl SegmenterConfig {
    /// Consecutive silent frames the run must strictly exceed before an
    /// utterance closes: 0.5 s / 30 ms frames -> 16.
    ///
    /// The arithmetic assumes the configured frame duration; changing the
    /// frame size without revisiting `silence_duration_s` shifts the real
    /// debounce window.
    pub fn silence_frame_threshold(&self) -> u32 {
        (self.silence_duration_s * 1000.0 / self.vad.frame_duration_ms()) as u32
    }

    pub fn frame_size_bytes(&self) -> usize {
        self.vad.frame_size_samples * 2
    }
}

/// Fixed-threshold segmentation state machine over 30 ms frames.
///
/// Owned by exactly one audio session; `feed` is synchronous and never
/// blocks. Frames observed while idle are discarded; once speech starts,
/// every frame (speech or silence) is retained so trailing words and the
/// debounce tail survive into the emitted utterance.
pub struct SpeechSegmenter {
    cfg: SegmenterConfig,
    silence_threshold: u32,
    frame_bytes: usize,
    classifier: Box<dyn FrameClassifier>,
    resampler: Option<StreamResampler>,
    carry: Vec<u8>,
    pending: VecDeque<Vec<u8>>,
    speaking: bool,
    silence_run: u32,
    metrics: Option<PipelineMetrics>,
}

impl SpeechSegmenter {
    pub fn new(cfg: SegmenterConfig) -> Self {
        let classifier: Box<dyn FrameClassifier> = Box::new(DualGateVad::new(cfg.vad.clone()));
        Self::with_classifier(cfg, classifier)
    }

    pub fn with_classifier(cfg: SegmenterConfig, classifier: Box<dyn FrameClassifier>) -> Self {
        Self {
            silence_threshold: cfg.silence_frame_threshold(),
            frame_bytes: cfg.frame_size_bytes(),
            cfg,
            classifier,
            resampler: None,
            carry: Vec::new(),
            pending: VecDeque::new(),
            speaking: false,
            silence_run: 0,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Feed a chunk of mono PCM at any rate. Returns the utterances that
    /// completed during this call, in emission order; more than one can
    /// complete when the caller delivers a large backlog at once.
    ///
    /// An empty `samples` slice is a heartbeat and changes nothing.
    pub fn feed(
        &mut self,
        sample_rate: u32,
        samples: &[i16],
    ) -> Result<Vec<Utterance>, SegmentError> {
        if sample_rate == 0 {
            return Err(SegmentError::InvalidSampleRate);
        }
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let resampled = self.resample(sample_rate, samples);
        self.carry.extend_from_slice(&samples_to_bytes(&resampled));

        let mut emitted = Vec::new();
        while self.carry.len() >= self.frame_bytes {
            let frame_bytes: Vec<u8> = self.carry.drain(..self.frame_bytes).collect();
            if let Some(utterance) = self.push_frame(frame_bytes) {
                emitted.push(utterance);
            }
        }
        Ok(emitted)
    }

    /// Force-close the in-progress utterance at end of input. Sub-frame
    /// carry bytes are dropped; the resampler restarts with the next
    /// session.
    pub fn finish(&mut self) -> Option<Utterance> {
        self.carry.clear();
        if let Some(rs) = &mut self.resampler {
            rs.reset();
        }
        if self.speaking && !self.pending.is_empty() {
            return Some(self.close_utterance());
        }
        self.speaking = false;
        self.silence_run = 0;
        None
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn carried_bytes(&self) -> usize {
        self.carry.len()
    }

    fn resample(&mut self, sample_rate: u32, samples: &[i16]) -> Vec<i16> {
        let target = self.cfg.target_sample_rate_hz;
        if sample_rate == target {
            return samples.to_vec();
        }

        let needs_rebuild = self
            .resampler
            .as_ref()
            .map(|rs| rs.input_rate() != sample_rate)
            .unwrap_or(true);
        if needs_rebuild {
            tracing::info!(
                from_hz = sample_rate,
                to_hz = target,
                "configuring stream resampler"
            );
            self.resampler = Some(StreamResampler::new(sample_rate, target));
        }

        match &mut self.resampler {
            Some(rs) => rs.process(samples),
            None => samples.to_vec(),
        }
    }

    fn push_frame(&mut self, frame_bytes: Vec<u8>) -> Option<Utterance> {
        let frame = bytes_to_samples(&frame_bytes);

        // A classification failure (e.g. malformed frame length) counts as
        // silence; the stream keeps going.
        let is_speech = match self.classifier.classify(&frame) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "frame classification failed, treating as silence");
                false
            }
        };
        if let Some(m) = &self.metrics {
            m.record_frame(is_speech);
        }

        if is_speech {
            if !self.speaking {
                tracing::debug!("speech detected");
                self.speaking = true;
                if let Some(m) = &self.metrics {
                    m.set_speaking(true);
                }
            }
            self.pending.push_back(frame_bytes);
            self.silence_run = 0;
            None
        } else if self.speaking {
            // Keep trailing silence so the debounce tail survives.
            self.pending.push_back(frame_bytes);
            self.silence_run += 1;
            if self.silence_run > self.silence_threshold {
                Some(self.close_utterance())
            } else {
                None
            }
        } else {
            if let Some(m) = &self.metrics {
                m.record_idle_drop();
            }
            None
        }
    }

    fn close_utterance(&mut self) -> Utterance {
        let mut audio = Vec::with_capacity(self.pending.len() * self.frame_bytes);
        for frame in self.pending.drain(..) {
            audio.extend_from_slice(&frame);
        }
        self.speaking = false;
        self.silence_run = 0;

        let utterance = Utterance {
            id: next_utterance_id(),
            audio,
        };
        tracing::debug!(
            id = utterance.id,
            ms = utterance.duration_ms(self.cfg.target_sample_rate_hz),
            "silence run complete, utterance closed"
        );
        if let Some(m) = &self.metrics {
            m.set_speaking(false);
            m.record_utterance();
        }
        utterance
    }
}
