use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters for cross-thread session monitoring.
#[derive(Clone, Default)]
pub struct PipelineMetrics {
    // Segmenter
    pub frames_in: Arc<AtomicU64>,
    pub frames_speech: Arc<AtomicU64>,
    pub frames_dropped_idle: Arc<AtomicU64>,
    pub utterances_emitted: Arc<AtomicU64>,
    pub is_speaking: Arc<AtomicBool>,
    pub last_utterance_time: Arc<RwLock<Option<Instant>>>,

    // Remote calls
    pub transcription_requests: Arc<AtomicU64>,
    pub transcription_failures: Arc<AtomicU64>,
    pub assist_requests: Arc<AtomicU64>,
    pub assist_failures: Arc<AtomicU64>,
    pub store_writes: Arc<AtomicU64>,
    pub store_write_failures: Arc<AtomicU64>,
}

impl PipelineMetrics {
    pub fn record_frame(&self, speech: bool) {
        self.frames_in.fetch_add(1, Ordering::Relaxed);
        if speech {
            self.frames_speech.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_idle_drop(&self) {
        self.frames_dropped_idle.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_speaking(&self, speaking: bool) {
        self.is_speaking.store(speaking, Ordering::Relaxed);
    }

    pub fn record_utterance(&self) {
        self.utterances_emitted.fetch_add(1, Ordering::Relaxed);
        *self.last_utterance_time.write() = Some(Instant::now());
    }

    pub fn record_transcription(&self, ok: bool) {
        self.transcription_requests.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.transcription_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_assist(&self, ok: bool) {
        self.assist_requests.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.assist_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_store_write(&self, ok: bool) {
        self.store_writes.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.store_write_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn utterances(&self) -> u64 {
        self.utterances_emitted.load(Ordering::Relaxed)
    }

    pub fn frames(&self) -> u64 {
        self.frames_in.load(Ordering::Relaxed)
    }
}
