use async_trait::async_trait;
use mediscribe_foundation::TranscriptionSettings;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::wav::pcm16_to_wav;
use crate::{SttError, Transcriber};

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Client for an OpenAI-style `audio/transcriptions` endpoint.
///
/// Utterance bytes are wrapped in a WAV container and posted as multipart
/// form data with the configured model name.
#[derive(Debug)]
pub struct RemoteWhisperTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    sample_rate_hz: u32,
}

impl RemoteWhisperTranscriber {
    pub fn new(settings: &TranscriptionSettings, sample_rate_hz: u32) -> Result<Self, SttError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| SttError::Disabled("transcription API key not configured".into()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
            sample_rate_hz,
        })
    }
}

#[async_trait]
impl Transcriber for RemoteWhisperTranscriber {
    async fn transcribe(&self, pcm: &[u8]) -> Result<String, SttError> {
        tracing::debug!(bytes = pcm.len(), "sending utterance for transcription");

        let wav = pcm16_to_wav(pcm, self.sample_rate_hz)?;
        let file = Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: TranscriptionResponse = response.json().await?;
        Ok(body.text.unwrap_or_default())
    }
}
