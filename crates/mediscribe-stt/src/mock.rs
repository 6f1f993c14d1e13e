use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::{SttError, Transcriber};

/// Deterministic transcriber for tests: replays a script of responses and
/// records the byte length of every utterance it was handed.
pub struct MockTranscriber {
    script: Mutex<VecDeque<Result<String, String>>>,
    received: Mutex<Vec<usize>>,
}

impl MockTranscriber {
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn received_lengths(&self) -> Vec<usize> {
        self.received.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.received.lock().len()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, pcm: &[u8]) -> Result<String, SttError> {
        self.received.lock().push(pcm.len());
        match self.script.lock().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(SttError::Response(message)),
            None => Ok(String::new()),
        }
    }
}
