//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::controller::Submission;
use crate::encoding::{DocumentSource, EncodingError};
use crate::errors::AppError;
use crate::state::AppState;
use crate::view::{self, AnalysisView};

/// The only document type the upload surface accepts. The encoder and
/// provider layers underneath stay format-agnostic.
const ACCEPTED_MEDIA_TYPE: &str = "application/pdf";

/// POST /api/v1/analysis
///
/// Multipart form: a `resume` file part plus a `job_title` text part.
/// Drives one full submission and returns the populated result view.
pub async fn handle_submit_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisView>, AppError> {
    let submission = read_submission(multipart).await?;
    state.controller.submit(submission).await?;
    Ok(Json(view::project(&state.controller.state())))
}

/// GET /api/v1/analysis
///
/// Current view projection: exactly one of empty, loading, error, or
/// result.
pub async fn handle_get_analysis(State(state): State<AppState>) -> Json<AnalysisView> {
    Json(view::project(&state.controller.state()))
}

/// Pulls the resume file and job title out of the multipart body.
/// Absent parts are left as None/empty; the controller decides whether
/// the submission is complete.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut document: Option<DocumentSource> = None;
    let mut role_title = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("resume") => {
                let media_type = field
                    .content_type()
                    .unwrap_or(ACCEPTED_MEDIA_TYPE)
                    .to_string();
                if media_type != ACCEPTED_MEDIA_TYPE {
                    return Err(AppError::Validation(format!(
                        "Unsupported resume type '{media_type}'; only {ACCEPTED_MEDIA_TYPE} is accepted"
                    )));
                }
                let bytes: Bytes = field.bytes().await.map_err(|e| {
                    AppError::Encoding(EncodingError::Read(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e,
                    )))
                })?;
                document = Some(DocumentSource::Bytes { bytes, media_type });
            }
            Some("job_title") => {
                role_title = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read job_title: {e}")))?;
            }
            _ => {
                // Unknown parts are ignored
            }
        }
    }

    Ok(Submission {
        document,
        role_title,
    })
}
