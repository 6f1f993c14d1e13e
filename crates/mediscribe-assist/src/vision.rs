use std::sync::Arc;

use crate::backend::{Content, GenerativeBackend};
use crate::prompts::PromptSet;

const ANALYSIS_TEMPERATURE: f32 = 0.1;

pub const ANALYSIS_FAILED_HEADER: &str = "### Analysis Failed";

/// Analyzes one uploaded medical image with the fixed instruction prompt.
pub struct ImageAnalyzer {
    backend: Arc<dyn GenerativeBackend>,
    prompts: PromptSet,
}

impl ImageAnalyzer {
    pub fn new(backend: Arc<dyn GenerativeBackend>, prompts: PromptSet) -> Self {
        Self { backend, prompts }
    }

    /// Free-form structured analysis text. Failures produce a visible
    /// markdown block instead of an error; callers filter those blocks out
    /// of report synthesis and spreadsheet writes.
    pub async fn analyze(&self, image: &[u8], mime_type: &str) -> String {
        let parts = [
            Content::text(self.prompts.image_analysis.clone()),
            Content::InlineImage {
                mime_type: mime_type.to_string(),
                data: image.to_vec(),
            },
        ];

        match self.backend.generate(&parts, ANALYSIS_TEMPERATURE).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "image analysis failed");
                format!("{ANALYSIS_FAILED_HEADER}\nAn error occurred: {e}")
            }
        }
    }
}

/// True when the text is a real analysis rather than a pending/failed
/// placeholder. Mirrors the guard applied before spreadsheet writes.
pub fn is_usable_analysis(text: &str) -> bool {
    !text.trim().is_empty() && !text.contains("Pending") && !text.contains("Failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    #[tokio::test]
    async fn analysis_passes_prompt_and_image() {
        let backend = Arc::new(MockBackend::new(vec![Ok("findings".into())]));
        let analyzer = ImageAnalyzer::new(backend.clone(), PromptSet::default());

        let out = analyzer.analyze(&[0xFF, 0xD8, 0x01], "image/jpeg").await;
        assert_eq!(out, "findings");

        let calls = backend.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].image_parts, 1);
        assert!((calls[0].temperature - 0.1).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn failure_renders_markdown_block() {
        let backend = Arc::new(MockBackend::new(vec![Err("overloaded".into())]));
        let analyzer = ImageAnalyzer::new(backend, PromptSet::default());

        let out = analyzer.analyze(&[1, 2, 3], "image/png").await;
        assert!(out.starts_with(ANALYSIS_FAILED_HEADER));
        assert!(!is_usable_analysis(&out));
    }

    #[test]
    fn usable_analysis_guard() {
        assert!(is_usable_analysis("## Key Findings\nnormal chest film"));
        assert!(!is_usable_analysis(""));
        assert!(!is_usable_analysis("Analysis Pending..."));
        assert!(!is_usable_analysis("### Analysis Failed\nboom"));
    }
}
