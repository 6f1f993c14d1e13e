use std::sync::Arc;

use crate::backend::{Content, GenerativeBackend};
use crate::prompts::PromptSet;

pub const NOTE_PLACEHOLDER: &str = "### Live Medical Note\n\n*Awaiting conversation...*";
pub const PREVIEW_PLACEHOLDER: &str = "### Doctor's Assistant\n\n*Awaiting conversation...*";
pub const SCRIBE_ERROR_MARKER: &str = "**[Scribe Error]**";
pub const PREVIEW_ERROR_MARKER: &str = "**[Assistant Error]**";
const NO_COMMAND: &str = "[NO_COMMAND]";

const NOTE_TEMPERATURE: f32 = 0.2;

/// Live-session operations: scribe note updates, the doctor's running
/// preview, and wake-word command extraction.
///
/// Every operation degrades locally; none of them can fail the session.
pub struct ScribeAssistant {
    backend: Arc<dyn GenerativeBackend>,
    prompts: PromptSet,
    wake_word: String,
}

impl ScribeAssistant {
    pub fn new(backend: Arc<dyn GenerativeBackend>, prompts: PromptSet, wake_word: String) -> Self {
        Self {
            backend,
            prompts,
            wake_word: wake_word.to_lowercase(),
        }
    }

    /// Fold the full transcript into the previous note. On failure the
    /// previous note survives with a visible error marker appended.
    pub async fn update_note(&self, full_transcript: &str, previous_note: &str) -> String {
        if full_transcript.trim().is_empty() {
            return previous_note.to_string();
        }

        let prompt = format!(
            "{}\n\n**PREVIOUS SUMMARY:**\n```markdown\n{}\n```\n\n**FULL TRANSCRIPT:**\n\"\"\"\n{}\n\"\"\"",
            self.prompts.scribe, previous_note, full_transcript
        );
        match self
            .backend
            .generate(&[Content::text(prompt)], NOTE_TEMPERATURE)
            .await
        {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!(error = %e, "scribe note update failed");
                format!("{previous_note}\n\n{SCRIBE_ERROR_MARKER}")
            }
        }
    }

    /// Running preview for the doctor; placeholder before any speech, error
    /// marker on failure.
    pub async fn doctor_preview(&self, full_transcript: &str) -> String {
        if full_transcript.trim().is_empty() {
            return PREVIEW_PLACEHOLDER.to_string();
        }

        let prompt = format!(
            "{}\n\n**FULL CONVERSATION TRANSCRIPT SO FAR:**\n\"\"\"\n{}\n\"\"\"",
            self.prompts.doctor, full_transcript
        );
        match self
            .backend
            .generate(&[Content::text(prompt)], NOTE_TEMPERATURE)
            .await
        {
            Ok(preview) => preview,
            Err(e) => {
                tracing::warn!(error = %e, "doctor preview failed");
                PREVIEW_ERROR_MARKER.to_string()
            }
        }
    }

    /// Extract a spoken command from the newest segment. Only runs when the
    /// wake word appears; `[NO_COMMAND]`, blank output, and errors all map
    /// to `None`.
    pub async fn extract_command(&self, segment: &str) -> Option<String> {
        if !segment.to_lowercase().contains(&self.wake_word) {
            return None;
        }

        let prompt = format!(
            "{}\n\n**TEXT SEGMENT TO ANALYZE:**\n\"\"\"\n{}\n\"\"\"",
            self.prompts.command, segment
        );
        match self
            .backend
            .generate(&[Content::text(prompt)], NOTE_TEMPERATURE)
            .await
        {
            Ok(raw) => {
                let command = raw.trim().to_string();
                if command.is_empty() || command == NO_COMMAND {
                    None
                } else {
                    Some(command)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "command extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    fn assistant(script: Vec<Result<String, String>>) -> (ScribeAssistant, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new(script));
        let assistant = ScribeAssistant::new(
            backend.clone(),
            PromptSet::default(),
            "jarvis".to_string(),
        );
        (assistant, backend)
    }

    #[tokio::test]
    async fn empty_transcript_keeps_previous_note() {
        let (assistant, backend) = assistant(vec![]);
        let note = assistant.update_note("   ", NOTE_PLACEHOLDER).await;
        assert_eq!(note, NOTE_PLACEHOLDER);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn failed_update_appends_marker_to_previous_note() {
        let (assistant, _) = assistant(vec![Err("503".into())]);
        let note = assistant.update_note("patient reports pain", "old note").await;
        assert_eq!(note, format!("old note\n\n{SCRIBE_ERROR_MARKER}"));
    }

    #[tokio::test]
    async fn successful_update_replaces_note() {
        let (assistant, _) = assistant(vec![Ok("new note".into())]);
        let note = assistant.update_note("patient reports pain", "old").await;
        assert_eq!(note, "new note");
    }

    #[tokio::test]
    async fn preview_placeholder_before_any_speech() {
        let (assistant, backend) = assistant(vec![]);
        assert_eq!(assistant.doctor_preview("").await, PREVIEW_PLACEHOLDER);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn command_requires_wake_word() {
        let (assistant, backend) = assistant(vec![Ok("open chart".into())]);
        assert_eq!(assistant.extract_command("please note the rash").await, None);
        assert_eq!(backend.calls(), 0);

        assert_eq!(
            assistant.extract_command("Jarvis, open the chart").await,
            Some("open chart".to_string())
        );
    }

    #[tokio::test]
    async fn no_command_sentinel_maps_to_none() {
        let (assistant, _) = assistant(vec![Ok("[NO_COMMAND]".into())]);
        assert_eq!(assistant.extract_command("jarvis hmm").await, None);
    }

    #[tokio::test]
    async fn backend_error_maps_to_none() {
        let (assistant, _) = assistant(vec![Err("timeout".into())]);
        assert_eq!(assistant.extract_command("jarvis do a thing").await, None);
    }
}
