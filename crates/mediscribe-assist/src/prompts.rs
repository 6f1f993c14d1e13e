use std::path::Path;

/// Instruction prompts for every generative operation.
///
/// Each prompt loads from `<name>_prompt.txt` in the configured directory
/// when present; otherwise the compiled-in default applies, so a missing
/// file never takes a feature down.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub scribe: String,
    pub doctor: String,
    pub command: String,
    pub image_analysis: String,
    pub report: String,
}

const DEFAULT_SCRIBE: &str = "You are a clinical scribe. Merge the new transcript into the \
previous structured visit note and return the updated note as markdown. Keep headings stable \
and never invent findings that are not in the transcript.";

const DEFAULT_DOCTOR: &str = "You are assisting the treating doctor during a live visit. From \
the conversation so far, summarize the working assessment, open questions, and suggested next \
steps as short markdown bullet points.";

const DEFAULT_COMMAND: &str = "The text segment may contain a spoken assistant command. Return \
only the command itself, stripped of the wake word and filler. If there is no actionable \
command, return exactly [NO_COMMAND].";

const DEFAULT_IMAGE_ANALYSIS: &str = "You are a medical imaging expert. Classify the uploaded \
document, extract any visible patient details (Name: [..]), and report:\n\
1. **Image Type & Region**\n2. **Key Findings**\n3. **Diagnostic Assessment**\n\
4. **Patient-Friendly Explanation**\nEnd with a disclaimer that this is not medical advice.";

const DEFAULT_REPORT: &str = "You are an expert medical scribe. Synthesize the patient \
demographics, medical history, current visit details, and the image analysis findings into one \
cohesive markdown report with these exact headings:\n### Patient Information\n\
### Medical History & Previous Summary\n### Current Visit Details\n\
### Comprehensive Image Analysis\n### Overall Synthesis & Impression";

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            scribe: DEFAULT_SCRIBE.to_string(),
            doctor: DEFAULT_DOCTOR.to_string(),
            command: DEFAULT_COMMAND.to_string(),
            image_analysis: DEFAULT_IMAGE_ANALYSIS.to_string(),
            report: DEFAULT_REPORT.to_string(),
        }
    }
}

impl PromptSet {
    pub fn load(dir: Option<&Path>) -> Self {
        let mut prompts = Self::default();
        let Some(dir) = dir else {
            return prompts;
        };

        for (name, slot) in [
            ("scribe", &mut prompts.scribe),
            ("doctor", &mut prompts.doctor),
            ("command", &mut prompts.command),
            ("image_analysis", &mut prompts.image_analysis),
            ("report", &mut prompts.report),
        ] {
            let path = dir.join(format!("{name}_prompt.txt"));
            match std::fs::read_to_string(&path) {
                Ok(text) if !text.trim().is_empty() => *slot = text,
                Ok(_) => {
                    tracing::warn!(path = %path.display(), "prompt file is empty, keeping default")
                }
                Err(_) => {
                    tracing::debug!(path = %path.display(), "no prompt override, using default")
                }
            }
        }
        prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_yields_defaults() {
        let prompts = PromptSet::load(None);
        assert_eq!(prompts.command, DEFAULT_COMMAND);
    }

    #[test]
    fn files_override_defaults() {
        let dir = std::env::temp_dir().join("mediscribe-prompt-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("doctor_prompt.txt"), "custom doctor prompt").unwrap();

        let prompts = PromptSet::load(Some(&dir));
        assert_eq!(prompts.doctor, "custom doctor prompt");
        assert_eq!(prompts.scribe, DEFAULT_SCRIBE);

        std::fs::remove_dir_all(&dir).ok();
    }
}
