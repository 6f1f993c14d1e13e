use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use mediscribe_foundation::GenerativeSettings;
use serde::{Deserialize, Serialize};

use crate::backend::{Content, GenerativeBackend};
use crate::AssistError;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inline_data")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for a `generateContent`-style JSON endpoint. Text parts pass
/// through as-is; image parts are base64 inline data.
#[derive(Debug)]
pub struct RemoteGenerativeBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl RemoteGenerativeBackend {
    pub fn new(settings: &GenerativeSettings) -> Result<Self, AssistError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| AssistError::Disabled("generative API key not configured".into()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: settings.endpoint.clone(),
            api_key,
            model: settings.model.clone(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        )
    }
}

#[async_trait]
impl GenerativeBackend for RemoteGenerativeBackend {
    async fn generate(&self, parts: &[Content], temperature: f32) -> Result<String, AssistError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: parts
                    .iter()
                    .map(|part| match part {
                        Content::Text(text) => RequestPart::Text { text: text.clone() },
                        Content::InlineImage { mime_type, data } => RequestPart::InlineData {
                            inline_data: InlineData {
                                mime_type: mime_type.clone(),
                                data: BASE64.encode(data),
                            },
                        },
                    })
                    .collect(),
            }],
            generation_config: GenerationConfig { temperature },
        };

        let response = self
            .client
            .post(self.url())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .map(|parts| {
                parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistError::Response("no candidate text in response".into()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_disables_the_backend() {
        let err = RemoteGenerativeBackend::new(&GenerativeSettings::default()).unwrap_err();
        assert!(matches!(err, AssistError::Disabled(_)));
    }

    #[test]
    fn request_serializes_text_and_image_parts() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text {
                        text: "describe".into(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: BASE64.encode([1u8, 2, 3]),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig { temperature: 0.1 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.1).abs() < 1e-6);
    }

    #[test]
    fn response_text_concatenates_candidate_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a "},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        let text: String = body.candidates.unwrap()[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .as_ref()
            .unwrap()
            .iter()
            .filter_map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "a b");
    }
}
