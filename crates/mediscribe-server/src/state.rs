use std::path::PathBuf;
use std::sync::Arc;

use mediscribe_assist::{ImageAnalyzer, ReportSynthesizer};
use mediscribe_records::RecordStore;

/// Request-scoped handles. Optional handles are features that failed their
/// startup credential check and answer 503 instead of crashing the server.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub analyzer: Option<Arc<ImageAnalyzer>>,
    pub synthesizer: Option<Arc<ReportSynthesizer>>,
    pub report_dir: PathBuf,
}

impl AppState {
    pub fn generative_enabled(&self) -> bool {
        self.analyzer.is_some() && self.synthesizer.is_some()
    }
}
