use std::sync::Arc;

use crate::backend::{Content, GenerativeBackend};
use crate::prompts::PromptSet;
use crate::AssistError;

const REPORT_TEMPERATURE: f32 = 0.4;

/// Everything the synthesizer folds into the final report.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub patient_info_md: String,
    pub history_md: String,
    pub image_analyses: Vec<String>,
}

impl ReportContext {
    fn render(&self) -> String {
        let mut context = String::from("Here is all the available information for a patient.\n");
        context.push_str(&format!(
            "## PATIENT DETAILS & CURRENT VISIT INFO:\n{}\n\n",
            self.patient_info_md
        ));
        context.push_str(&format!(
            "## PAST MEDICAL SUMMARY:\n{}\n\n",
            self.history_md
        ));

        if self.image_analyses.is_empty() {
            context.push_str(
                "## NEW IMAGE ANALYSIS FINDINGS:\nNo successful image analyses were performed.\n\n",
            );
        } else {
            context.push_str("## NEW IMAGE ANALYSIS FINDINGS:\n");
            for (i, analysis) in self.image_analyses.iter().enumerate() {
                context.push_str(&format!("### Analysis of Image {}\n{}\n\n", i + 1, analysis));
            }
        }
        context
    }
}

/// Synthesizes the combined visit report. Unlike the live-session
/// operations this propagates failure: the API caller decides how to
/// answer the request.
pub struct ReportSynthesizer {
    backend: Arc<dyn GenerativeBackend>,
    prompts: PromptSet,
}

impl ReportSynthesizer {
    pub fn new(backend: Arc<dyn GenerativeBackend>, prompts: PromptSet) -> Self {
        Self { backend, prompts }
    }

    pub async fn synthesize(&self, context: &ReportContext) -> Result<String, AssistError> {
        let parts = [
            Content::text(self.prompts.report.clone()),
            Content::text(context.render()),
        ];
        self.backend.generate(&parts, REPORT_TEMPERATURE).await
    }
}
