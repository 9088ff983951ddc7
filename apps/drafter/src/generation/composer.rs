//! Document Composer: turns selected content into the Markdown CV and the
//! covering letter. Inputs are only read; all output comes from the model.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::content_selector::StructuredCv;
use crate::generation::job::JobDescription;
use crate::generation::prompts::{
    COVERING_LETTER_PROMPT_TEMPLATE, COVERING_LETTER_SYSTEM, CV_PROMPT_TEMPLATE, CV_SYSTEM,
    NO_TONE_NOTES,
};
use crate::llm_client::prompts::{render, GROUNDING_INSTRUCTION};
use crate::llm_client::{invoke_structured, schemas, ModelGateway, ModelRequest};
use crate::models::profile::CandidateProfile;

/// Payload of the `cv_markdown` schema. Shared with the edit applier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvMarkdown {
    pub cv_markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CoveringLetter {
    covering_letter: String,
}

/// Composes the Markdown CV from ranked, redacted content.
pub async fn compose_cv(cv: &StructuredCv, llm: &dyn ModelGateway) -> Result<String, AppError> {
    let prompt = build_cv_prompt(cv)?;
    let request = ModelRequest::new(CV_SYSTEM, prompt).with_schema(schemas::cv_markdown());

    let composed: CvMarkdown = invoke_structured(llm, &request)
        .await
        .map_err(|e| AppError::llm("CV composition failed", e))?;

    info!("Composed CV ({} chars)", composed.cv_markdown.len());
    Ok(composed.cv_markdown)
}

/// Writes a covering letter for `job` in the voice described by `tone_notes`.
pub async fn compose_covering_letter(
    profile: &CandidateProfile,
    tone_notes: &str,
    job: &JobDescription,
    llm: &dyn ModelGateway,
) -> Result<String, AppError> {
    let prompt = build_covering_letter_prompt(profile, tone_notes, job)?;
    let request = ModelRequest::new(COVERING_LETTER_SYSTEM, prompt)
        .with_schema(schemas::covering_letter());

    let letter: CoveringLetter = invoke_structured(llm, &request)
        .await
        .map_err(|e| AppError::llm("Covering letter composition failed", e))?;

    info!("Composed covering letter ({} chars)", letter.covering_letter.len());
    Ok(letter.covering_letter)
}

fn build_cv_prompt(cv: &StructuredCv) -> Result<String, AppError> {
    let cv_json = serde_json::to_string_pretty(cv)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize CV data: {e}")))?;

    Ok(render(
        CV_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("cv_json", cv_json.as_str()),
        ],
    ))
}

fn build_covering_letter_prompt(
    profile: &CandidateProfile,
    tone_notes: &str,
    job: &JobDescription,
) -> Result<String, AppError> {
    let profile_json = serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))?;

    let tone_notes = match tone_notes.trim() {
        "" => NO_TONE_NOTES,
        notes => notes,
    };

    Ok(render(
        COVERING_LETTER_PROMPT_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("profile_json", profile_json.as_str()),
            ("tone_notes", tone_notes),
            ("job_description", job.description.as_str()),
        ],
    ))
}
