use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub spreadsheet: bool,
    pub generative: bool,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientDataResponse {
    pub patient_info: String,
    pub summary_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageAnalysisResponse {
    pub analysis: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportGenerationResponse {
    pub report: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_update_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
}

impl ReportGenerationResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            report: String::new(),
            success: false,
            error: Some(error.into()),
            database_update_status: Some("Failed due to error".to_string()),
            pdf_path: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateFromAnalysisRequest {
    pub abha_id: String,
    pub image_analyses: Vec<String>,
}
