use serde::Deserialize;

use crate::error::AppError;

/// Remote transcription endpoint settings (Whisper-compatible API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.groq.com/openai/v1/audio/transcriptions".to_string(),
            model: "whisper-large-v3".to_string(),
        }
    }
}

/// Generative model endpoint settings (generateContent-style API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerativeSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
}

impl Default for GenerativeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash-latest".to_string(),
        }
    }
}

/// Spreadsheet-backed record store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordsSettings {
    /// OAuth bearer token with spreadsheet scope. Token provisioning is
    /// external; without one the store degrades to the offline dataset.
    pub api_token: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub worksheet: String,
}

impl Default for RecordsSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            spreadsheet_id: None,
            worksheet: "Sheet1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub report_dir: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
            report_dir: "reports".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Spoken prefix that routes a transcript segment to command extraction.
    pub wake_word: String,
    /// Directory holding prompt text files; compiled-in defaults otherwise.
    pub prompt_dir: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            wake_word: "jarvis".to_string(),
            prompt_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub transcription: TranscriptionSettings,
    pub generative: GenerativeSettings,
    pub records: RecordsSettings,
    pub server: ServerSettings,
    pub session: SessionSettings,
}

impl AppConfig {
    /// Load configuration from an optional `mediscribe.toml` plus
    /// `MEDISCRIBE_*` environment overrides (`__` separates levels, e.g.
    /// `MEDISCRIBE_TRANSCRIPTION__API_KEY`).
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("mediscribe")
    }

    pub fn load_from(basename: &str) -> Result<Self, AppError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(basename).required(false))
            .add_source(config::Environment::with_prefix("MEDISCRIBE").separator("__"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn features(&self) -> FeatureSet {
        FeatureSet {
            transcription: availability(
                self.transcription.api_key.is_some(),
                "transcription API key not configured",
            ),
            generative: availability(
                self.generative.api_key.is_some(),
                "generative API key not configured",
            ),
            records: availability(
                self.records.api_token.is_some() && self.records.spreadsheet_id.is_some(),
                "spreadsheet credentials not configured, using offline dataset",
            ),
        }
    }
}

/// Startup availability of a credentialed feature. Missing credentials
/// disable the feature; they never abort the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Enabled,
    Disabled { reason: String },
}

impl Availability {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Availability::Enabled)
    }
}

#[derive(Debug, Clone)]
pub struct FeatureSet {
    pub transcription: Availability,
    pub generative: Availability,
    pub records: Availability,
}

impl FeatureSet {
    pub fn log_summary(&self) {
        for (name, feature) in [
            ("transcription", &self.transcription),
            ("generative", &self.generative),
            ("records", &self.records),
        ] {
            match feature {
                Availability::Enabled => tracing::info!(feature = name, "feature enabled"),
                Availability::Disabled { reason } => {
                    tracing::warn!(feature = name, reason = %reason, "feature disabled")
                }
            }
        }
    }
}

fn availability(enabled: bool, reason: &str) -> Availability {
    if enabled {
        Availability::Enabled
    } else {
        Availability::Disabled {
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_credentialed_features() {
        let cfg = AppConfig::default();
        let features = cfg.features();
        assert!(!features.transcription.is_enabled());
        assert!(!features.generative.is_enabled());
        assert!(!features.records.is_enabled());
    }

    #[test]
    fn features_enable_with_credentials() {
        let cfg = AppConfig {
            transcription: TranscriptionSettings {
                api_key: Some("k".into()),
                ..Default::default()
            },
            records: RecordsSettings {
                api_token: Some("t".into()),
                spreadsheet_id: Some("sheet".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let features = cfg.features();
        assert!(features.transcription.is_enabled());
        assert!(features.records.is_enabled());
        assert!(!features.generative.is_enabled());
    }

    #[test]
    fn defaults_have_sane_endpoint_shapes() {
        let cfg = AppConfig::default();
        assert!(cfg.transcription.endpoint.starts_with("https://"));
        assert_eq!(cfg.session.wake_word, "jarvis");
        assert_eq!(cfg.server.port, 8000);
    }
}
