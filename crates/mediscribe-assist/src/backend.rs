use async_trait::async_trait;

use crate::AssistError;

/// One part of a generative request.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

impl Content {
    pub fn text(s: impl Into<String>) -> Self {
        Content::Text(s.into())
    }
}

/// Opaque remote text-generation call. Implementations are shared across
/// tasks, so requests take `&self`.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, parts: &[Content], temperature: f32) -> Result<String, AssistError>;
}
