//! Remote generative-model operations for the visit assistant.
//!
//! Everything here is API glue over one [`GenerativeBackend`] seam: the
//! live-session scribe operations, the image analyzer, and the report
//! synthesizer. Transient failures degrade to visible markers; only report
//! synthesis propagates its error to the caller.

pub mod backend;
pub mod mock;
pub mod prompts;
pub mod remote;
pub mod scribe;
pub mod synthesis;
pub mod vision;

pub use backend::{Content, GenerativeBackend};
pub use mock::MockBackend;
pub use prompts::PromptSet;
pub use remote::RemoteGenerativeBackend;
pub use scribe::ScribeAssistant;
pub use synthesis::{ReportContext, ReportSynthesizer};
pub use vision::{is_usable_analysis, ImageAnalyzer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistError {
    #[error("generative backend disabled: {0}")]
    Disabled(String),

    #[error("generative request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected generative response: {0}")]
    Response(String),
}
