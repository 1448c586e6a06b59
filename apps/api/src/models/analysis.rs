use serde::{Deserialize, Serialize};

use crate::analysis::scoring::match_percentage;

/// One analysis submission, fully assembled: encoded document plus the
/// role the user is targeting. Built fresh per submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Document content as raw base64 (no data-URI prefix).
    pub document_data: String,
    pub media_type: String,
    pub role_title: String,
}

/// The five-field object the model is asked to return. Every field is
/// required; serde rejects a reply that omits any of them. Unknown extra
/// fields (including a volunteered percentage) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub summary: String,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Advice items separated by newline characters. Split only at
    /// presentation time; a string, not a list, on the wire.
    pub career_guidance: String,
    pub interview_questions: Vec<String>,
}

/// A completed analysis: the model's payload plus the locally derived
/// match percentage. Immutable once produced; replaced wholesale on each
/// new submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0-100, computed from the two skill-list lengths. Never taken from
    /// the model.
    pub match_percentage: u8,
    pub summary: String,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub career_guidance: String,
    pub interview_questions: Vec<String>,
}

impl From<AnalysisPayload> for AnalysisResult {
    fn from(payload: AnalysisPayload) -> Self {
        let score = match_percentage(payload.matching_skills.len(), payload.missing_skills.len());
        AnalysisResult {
            match_percentage: score,
            summary: payload.summary,
            matching_skills: payload.matching_skills,
            missing_skills: payload.missing_skills,
            career_guidance: payload.career_guidance,
            interview_questions: payload.interview_questions,
        }
    }
}
