//! Analysis provider — trait-based seam in front of the generative model.
//!
//! Held in app state as `Arc<dyn AnalysisProvider>` so the concrete
//! service can be swapped without touching the controller or handlers.

use async_trait::async_trait;
use tracing::info;

use crate::analysis::prompts::{analysis_prompt, analysis_response_schema};
use crate::errors::AppError;
use crate::llm_client::{GeminiClient, InlineData};
use crate::models::analysis::{AnalysisPayload, AnalysisRequest, AnalysisResult};

/// The analysis seam. One operation: a full request in, a scored result
/// out, or a failure.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError>;
}

/// Production provider backed by the Gemini client.
pub struct GeminiAnalyzer {
    llm: GeminiClient,
}

impl GeminiAnalyzer {
    pub fn new(llm: GeminiClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AppError> {
        let prompt = analysis_prompt(&request.role_title);
        let document = InlineData {
            mime_type: request.media_type.clone(),
            data: request.document_data.clone(),
        };

        let payload: AnalysisPayload = self
            .llm
            .generate_json(&prompt, document, analysis_response_schema())
            .await
            .map_err(|cause| AppError::Analysis { cause })?;

        let result = AnalysisResult::from(payload);
        info!(
            "Analysis complete: {} matching, {} missing, score {}",
            result.matching_skills.len(),
            result.missing_skills.len(),
            result.match_percentage
        );

        Ok(result)
    }
}
