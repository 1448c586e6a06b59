// All prompt constants and the response-schema declaration for the
// analysis service. The schema and the prompt move together: both name
// exactly the same five fields.

use serde_json::{json, Value};

/// Analysis instruction template. Replace `{role_title}` before sending.
///
/// The percentage is NOT requested here: the fit score is derived locally
/// from the returned skill lists, so the model is told to leave it out.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and HR analyst AI.
Your task is to analyze the user's resume, provided as a file, against a specific job title.

First, from the job title "{role_title}", infer the typical skills, responsibilities, and qualifications required for the role.

Next, thoroughly analyze the user's attached resume file.

Finally, based on this two-pronged analysis, generate a JSON object with exactly these five fields:
1. "summary": a concise, objective one-sentence summary of the user's fit.
2. "matchingSkills": skills from the resume that match the inferred job requirements.
3. "missingSkills": key skills required for the job that seem to be missing from the resume.
4. "careerGuidance": actionable advice to bridge these gaps. Each distinct piece of advice must be on its own line, separated by a newline character.
5. "interviewQuestions": 3-5 tailored interview questions based on the resume and job role.

Do NOT compute or include any match percentage or numeric score. That is calculated separately.

Ensure the analysis is detailed, accurate, and constructive. The JSON output must adhere strictly to the provided schema."#;

/// Builds the analysis prompt for a given role title.
pub fn analysis_prompt(role_title: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{role_title}", role_title)
}

/// Declared response schema: an object with the five analysis fields, all
/// required. No percentage field exists here.
pub fn analysis_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise, objective one-sentence summary of the user's fit."
            },
            "matchingSkills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key skills from the resume that match the job requirements."
            },
            "missingSkills": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key skills required for the job missing from the resume."
            },
            "careerGuidance": {
                "type": "STRING",
                "description": "Actionable advice, each distinct piece separated by a newline character."
            },
            "interviewQuestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-5 tailored interview questions based on the resume and job role."
            }
        },
        "required": [
            "summary",
            "matchingSkills",
            "missingSkills",
            "careerGuidance",
            "interviewQuestions"
        ]
    })
}
