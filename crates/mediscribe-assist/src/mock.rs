use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::backend::{Content, GenerativeBackend};
use crate::AssistError;

/// One recorded `generate` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub image_parts: usize,
    pub temperature: f32,
}

/// Scripted backend for tests: pops one response per call and records what
/// it was asked.
pub struct MockBackend {
    script: Mutex<VecDeque<Result<String, String>>>,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().len()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, parts: &[Content], temperature: f32) -> Result<String, AssistError> {
        let prompt = parts
            .iter()
            .filter_map(|p| match p {
                Content::Text(t) => Some(t.as_str()),
                Content::InlineImage { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        let image_parts = parts
            .iter()
            .filter(|p| matches!(p, Content::InlineImage { .. }))
            .count();
        self.recorded.lock().push(RecordedCall {
            prompt,
            image_parts,
            temperature,
        });

        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AssistError::Response(message)),
            None => Err(AssistError::Response("mock script exhausted".into())),
        }
    }
}
