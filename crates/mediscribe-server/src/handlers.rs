use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::Json;
use serde_json::json;

use mediscribe_assist::{is_usable_analysis, ReportContext};
use mediscribe_records::{image_slot_header, PatientRecord, MAX_IMAGE_SLOTS};
use mediscribe_report::{ImageAttachment, ReportPdf};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    GenerateFromAnalysisRequest, HealthResponse, ImageAnalysisResponse, PatientDataResponse,
    ReportGenerationResponse,
};

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Medical Report API is running", "status": "healthy" }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        spreadsheet: state.records.is_live(),
        generative: state.generative_enabled(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Point lookup. A missing record is a recoverable payload, not a failure
/// status: the UI renders the message in place of the demographics block.
pub async fn get_patient(
    State(state): State<AppState>,
    Path(abha_id): Path<String>,
) -> Result<Json<PatientDataResponse>, ApiError> {
    match state.records.fetch(&abha_id).await? {
        Some(record) => Ok(Json(PatientDataResponse {
            patient_info: record.demographics_markdown(),
            summary_text: record.history_markdown(),
        })),
        None => Ok(Json(PatientDataResponse {
            patient_info: format!("**Status:** No record found for ABHA ID: `{}`", abha_id.trim()),
            summary_text: String::new(),
        })),
    }
}

pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageAnalysisResponse>, ApiError> {
    let analyzer = state
        .analyzer
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("generative backend not configured".into()))?;

    let Some(field) = multipart.next_field().await? else {
        return Err(ApiError::BadRequest("no file in request".into()));
    };
    let mime = field.content_type().unwrap_or_default().to_string();
    if !mime.starts_with("image/") {
        return Err(ApiError::BadRequest("File must be an image".into()));
    }
    let bytes = field.bytes().await?;

    let analysis = analyzer.analyze(&bytes, &mime).await;
    Ok(Json(ImageAnalysisResponse {
        analysis,
        success: true,
        error: None,
    }))
}

pub async fn generate_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReportGenerationResponse>, ApiError> {
    let analyzer = state
        .analyzer
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("generative backend not configured".into()))?
        .clone();

    let mut abha_id: Option<String> = None;
    let mut images: Vec<(Vec<u8>, String)> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("abha_id") {
            abha_id = Some(field.text().await?);
            continue;
        }
        let mime = field.content_type().unwrap_or_default().to_string();
        if mime.starts_with("image/") && images.len() < MAX_IMAGE_SLOTS {
            images.push((field.bytes().await?.to_vec(), mime));
        }
    }
    let abha_id = abha_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("abha_id form field is required".into()))?;

    let record = fetch_known_patient(&state, &abha_id).await?;

    let mut attachments = Vec::new();
    for (bytes, mime) in images {
        let analysis = analyzer.analyze(&bytes, &mime).await;
        attachments.push(ImageAttachment { bytes, analysis });
    }
    let analyses: Vec<String> = attachments
        .iter()
        .map(|a| a.analysis.clone())
        .filter(|a| is_usable_analysis(a))
        .collect();

    finish_report(&state, &abha_id, &record, analyses, attachments).await
}

pub async fn generate_report_from_analysis(
    State(state): State<AppState>,
    Json(request): Json<GenerateFromAnalysisRequest>,
) -> Result<Json<ReportGenerationResponse>, ApiError> {
    if !state.generative_enabled() {
        return Err(ApiError::ServiceUnavailable(
            "generative backend not configured".into(),
        ));
    }

    let record = fetch_known_patient(&state, &request.abha_id).await?;
    let analyses: Vec<String> = request
        .image_analyses
        .into_iter()
        .filter(|a| is_usable_analysis(a))
        .collect();

    finish_report(&state, &request.abha_id, &record, analyses, Vec::new()).await
}

pub async fn download_pdf(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
        return Err(ApiError::BadRequest("invalid report filename".into()));
    }

    let path = state.report_dir.join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("PDF file not found".into()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes))
}

async fn fetch_known_patient(
    state: &AppState,
    abha_id: &str,
) -> Result<PatientRecord, ApiError> {
    state
        .records
        .fetch(abha_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}

/// Shared tail of both report endpoints: synthesize, write back, render.
async fn finish_report(
    state: &AppState,
    abha_id: &str,
    record: &PatientRecord,
    analyses: Vec<String>,
    attachments: Vec<ImageAttachment>,
) -> Result<Json<ReportGenerationResponse>, ApiError> {
    let synthesizer = state
        .synthesizer
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("generative backend not configured".into()))?;

    let context = ReportContext {
        patient_info_md: record.demographics_markdown(),
        history_md: record.history_markdown(),
        image_analyses: analyses.clone(),
    };

    let report = match synthesizer.synthesize(&context).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(error = %e, "report synthesis failed");
            return Ok(Json(ReportGenerationResponse::failure(e.to_string())));
        }
    };

    let mut fields = vec![("executive_summary".to_string(), report.clone())];
    for (i, analysis) in analyses.iter().take(MAX_IMAGE_SLOTS).enumerate() {
        fields.push((image_slot_header(i + 1), analysis.clone()));
    }
    let outcome = state.records.write_fields(abha_id, &fields).await?;
    let database_update_status = if outcome.updated_cells > 0 {
        format!("Database update complete ({} cells).", outcome.updated_cells)
    } else {
        "No new data to update in the database.".to_string()
    };

    // A failed render degrades to a report without a PDF link.
    let pdf_path = match render_pdf(state, &report, &attachments).await {
        Ok(filename) => Some(filename),
        Err(e) => {
            tracing::warn!(error = %e, "PDF generation failed");
            None
        }
    };

    Ok(Json(ReportGenerationResponse {
        report,
        success: true,
        error: None,
        database_update_status: Some(database_update_status),
        pdf_path,
    }))
}

async fn render_pdf(
    state: &AppState,
    report: &str,
    attachments: &[ImageAttachment],
) -> Result<String, ApiError> {
    tokio::fs::create_dir_all(&state.report_dir)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let filename = format!(
        "medical_report_{}.pdf",
        chrono::Utc::now().format("%Y%m%d%H%M%S%3f")
    );
    let path = state.report_dir.join(&filename);
    ReportPdf::default()
        .render(report, attachments, &path)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(filename)
}
