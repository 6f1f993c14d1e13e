//! Visit report rendering.
//!
//! A line-by-line markdown-subset translator lays the synthesized report
//! out as a paginated A4 PDF, followed by one section per analyzed image.
//! Field extraction from model text is regex-based and deliberately kept
//! behind a narrow interface so the heuristics can be swapped out.

pub mod extract;
pub mod layout;
pub mod pdf;

pub use extract::{digest_analysis, extract_field, AnalysisDigest};
pub use layout::{parse_markdown, strip_emphasis, wrap, Block};
pub use pdf::{ImageAttachment, ReportPdf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to render report: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
