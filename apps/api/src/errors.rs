use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::encoding::EncodingError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// A submission is already in flight; only one runs at a time.
    #[error("An analysis is already in progress. Please wait for it to finish.")]
    Busy,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Any failure between submitting the request and obtaining a parsed
    /// result. The user-facing message is fixed; the cause is logged only.
    #[error("Failed to get analysis from AI")]
    Analysis {
        #[source]
        cause: LlmError,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Busy => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS", self.to_string()),
            AppError::Encoding(e) => {
                tracing::error!("Encoding error: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "ENCODING_ERROR",
                    self.to_string(),
                )
            }
            AppError::Analysis { cause } => {
                tracing::error!("Analysis service error: {cause}");
                (StatusCode::BAD_GATEWAY, "ANALYSIS_ERROR", self.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
