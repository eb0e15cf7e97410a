//! Submission pipeline: orchestrates one form submission end to end.
//!
//! Flow: validate → build prompt → generate (model fallback) → persist → respond.
//!
//! Validation and generation failures abort the flow before anything is
//! written. A persistence failure does not: the generated text is still
//! returned, with the failure reported alongside it.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::submission::SubmissionForm;
use crate::submission::download::download_filename;
use crate::submission::prompts::build_prompt;
use crate::submission::store::SubmissionStore;
use crate::submission::validation::validate_submission;

/// Outcome of the save step, reported to the client verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistenceStatus {
    pub saved: bool,
    pub error: Option<String>,
}

/// Everything the presenter needs once generation succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub submission_id: Uuid,
    pub description: String,
    pub filename: String,
    pub persistence: PersistenceStatus,
}

/// Runs one submission through the pipeline.
///
/// Steps:
/// 1. validate_submission() → JobSubmission (400 on missing required fields)
/// 2. build_prompt()
/// 3. generator.generate() → text (502 with the generation marker on failure)
/// 4. store.save(): failures captured, never propagated
/// 5. derive the download filename
pub async fn run_submission(
    form: SubmissionForm,
    today: NaiveDate,
    generator: &dyn TextGenerator,
    store: &dyn SubmissionStore,
) -> Result<GenerateResponse, AppError> {
    let submission_id = Uuid::new_v4();
    let span = info_span!("submission", %submission_id);

    async move {
        // Step 1: Validate
        let submission = validate_submission(form, today)?;
        info!(
            "Validated submission: '{}' ({})",
            submission.job_title, submission.experience_level
        );

        // Step 2: Prompt
        let prompt = build_prompt(&submission);

        // Step 3: Generate
        let description = generator
            .generate(&prompt)
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        // Step 4: Persist (isolated)
        let persistence = match store.save(&submission).await {
            Ok(()) => PersistenceStatus {
                saved: true,
                error: None,
            },
            Err(e) => {
                error!("Failed to save submission: {e}");
                PersistenceStatus {
                    saved: false,
                    error: Some(format!("Failed to save job to database: {e}")),
                }
            }
        };

        // Step 5: Present
        let filename = download_filename(&submission.company_name, &submission.job_title);

        Ok::<_, AppError>(GenerateResponse {
            submission_id,
            description,
            filename,
            persistence,
        })
    }
    .instrument(span)
    .await
}
