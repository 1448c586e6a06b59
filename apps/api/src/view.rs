//! Presentation projection — pure function of controller state.
//!
//! Exactly one of four mutually exclusive views comes out: empty,
//! loading, error, or the populated result. Rendering technology is the
//! caller's business; this module only shapes the data.

use serde::Serialize;

use crate::controller::AnalysisState;
use crate::models::analysis::AnalysisResult;

/// Score band matching the result gauge: below 40 is low, 40-69 is
/// moderate, 70 and up is strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Moderate,
    Strong,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score < 40 {
            ScoreBand::Low
        } else if score < 70 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Strong
        }
    }
}

/// One of the four views. Serialized with a `view` discriminant so a
/// client can switch on it directly.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum AnalysisView {
    Empty,
    Loading,
    #[serde(rename_all = "camelCase")]
    Error { message: String },
    #[serde(rename_all = "camelCase")]
    Result {
        match_percentage: u8,
        score_band: ScoreBand,
        summary: String,
        matching_skills: Vec<String>,
        missing_skills: Vec<String>,
        guidance_items: Vec<String>,
        interview_questions: Vec<String>,
    },
}

/// Projects the controller state into its view.
pub fn project(state: &AnalysisState) -> AnalysisView {
    match state {
        AnalysisState::Idle => AnalysisView::Empty,
        AnalysisState::Submitting => AnalysisView::Loading,
        AnalysisState::Failed { message } => AnalysisView::Error {
            message: message.clone(),
        },
        AnalysisState::Succeeded(result) => result_view(result),
    }
}

fn result_view(result: &AnalysisResult) -> AnalysisView {
    AnalysisView::Result {
        match_percentage: result.match_percentage,
        score_band: ScoreBand::for_score(result.match_percentage),
        summary: result.summary.clone(),
        matching_skills: result.matching_skills.clone(),
        missing_skills: result.missing_skills.clone(),
        guidance_items: split_guidance(&result.career_guidance),
        interview_questions: result.interview_questions.clone(),
    }
}

/// Splits newline-separated guidance into items, dropping blank lines.
pub fn split_guidance(guidance: &str) -> Vec<String> {
    guidance
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
