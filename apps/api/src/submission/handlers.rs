//! Axum route handlers for the job description API.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use chrono::Local;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::submission::SubmissionForm;
use crate::state::AppState;
use crate::submission::download::{download_filename, text_attachment};
use crate::submission::pipeline::{run_submission, GenerateResponse};

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub company_name: String,
    pub job_title: String,
    pub description: String,
}

/// POST /api/v1/job-descriptions
///
/// Validates the form, generates the description, saves the submission,
/// and returns the text with its download filename. A failed save is
/// reported in `persistence` rather than failing the request.
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionForm>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(form) = payload?;
    let today = Local::now().date_naive();
    let response = run_submission(
        form,
        today,
        state.generator.as_ref(),
        state.store.as_ref(),
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/job-descriptions/download
///
/// Serves previously generated text as a `text/plain` attachment.
pub async fn handle_download(
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let filename = download_filename(request.company_name.trim(), request.job_title.trim());
    text_attachment(&filename, request.description)
}
