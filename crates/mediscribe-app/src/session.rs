use std::sync::Arc;

use mediscribe_assist::scribe::{NOTE_PLACEHOLDER, PREVIEW_PLACEHOLDER};
use mediscribe_assist::ScribeAssistant;
use mediscribe_segmenter::segmenter::Utterance;
use mediscribe_segmenter::{SegmentError, SpeechSegmenter};
use mediscribe_stt::Transcriber;
use mediscribe_telemetry::PipelineMetrics;

/// Everything a UI needs to render the session after a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub transcript: String,
    pub note: String,
    pub preview: String,
    pub commands: Vec<String>,
}

/// One live visit: owns the segmenter state exclusively, accumulates the
/// transcript, and fans out the assistant calls on every utterance.
pub struct ScribeSession {
    segmenter: SpeechSegmenter,
    transcriber: Arc<dyn Transcriber>,
    /// None when the generative feature failed its startup credential
    /// check; transcription still works and notes keep their placeholders.
    assistant: Option<ScribeAssistant>,
    metrics: PipelineMetrics,
    transcript: String,
    note: String,
    preview: String,
    commands: Vec<String>,
}

impl ScribeSession {
    pub fn new(
        segmenter: SpeechSegmenter,
        transcriber: Arc<dyn Transcriber>,
        assistant: Option<ScribeAssistant>,
    ) -> Self {
        Self {
            segmenter,
            transcriber,
            assistant,
            metrics: PipelineMetrics::default(),
            transcript: String::new(),
            note: NOTE_PLACEHOLDER.to_string(),
            preview: PREVIEW_PLACEHOLDER.to_string(),
            commands: Vec::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.trim().to_string(),
            note: self.note.clone(),
            preview: self.preview.clone(),
            commands: self.commands.clone(),
        }
    }

    /// Push one audio delivery. `None` is the `(null, null)` heartbeat: no
    /// new data, the current snapshot comes back unchanged.
    pub async fn push(
        &mut self,
        input: Option<(u32, Vec<i16>)>,
    ) -> Result<SessionSnapshot, SegmentError> {
        let Some((sample_rate, samples)) = input else {
            return Ok(self.snapshot());
        };

        let utterances = self.segmenter.feed(sample_rate, &samples)?;
        for utterance in utterances {
            self.handle_utterance(utterance).await;
        }
        Ok(self.snapshot())
    }

    /// End of input: flush whatever the segmenter still holds.
    pub async fn finish(&mut self) -> SessionSnapshot {
        if let Some(utterance) = self.segmenter.finish() {
            self.handle_utterance(utterance).await;
        }
        self.snapshot()
    }

    /// Reset everything for the next visit.
    pub fn clear(&mut self) {
        let _ = self.segmenter.finish();
        self.transcript.clear();
        self.note = NOTE_PLACEHOLDER.to_string();
        self.preview = PREVIEW_PLACEHOLDER.to_string();
        self.commands.clear();
    }

    async fn handle_utterance(&mut self, utterance: Utterance) {
        let segment = match self.transcriber.transcribe(&utterance.audio).await {
            Ok(text) => {
                self.metrics.record_transcription(true);
                text.trim().to_string()
            }
            Err(e) => {
                // The failed segment never reaches the transcript or the
                // assistant calls.
                self.metrics.record_transcription(false);
                tracing::warn!(id = utterance.id, error = %e, "transcription failed");
                return;
            }
        };
        if segment.is_empty() {
            return;
        }

        if self.transcript.is_empty() {
            self.transcript = segment.clone();
        } else {
            self.transcript.push(' ');
            self.transcript.push_str(&segment);
        }

        let Some(assistant) = &self.assistant else {
            return;
        };

        // Fan out and join all three; each call carries its own fallback,
        // so one failure never cancels the others.
        let (note, preview, command) = tokio::join!(
            assistant.update_note(&self.transcript, &self.note),
            assistant.doctor_preview(&self.transcript),
            assistant.extract_command(&segment),
        );
        self.metrics.record_assist(true);
        self.note = note;
        self.preview = preview;
        if let Some(command) = command {
            self.commands.push(format!("> {command}"));
        }
    }
}
