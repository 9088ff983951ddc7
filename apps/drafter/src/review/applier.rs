//! Edit Applier: merges the approved edits into the document.
//!
//! "Apply only what was approved" is a prompt-level instruction; the result is
//! not checked mechanically.

use tracing::info;

use crate::errors::AppError;
use crate::generation::composer::CvMarkdown;
use crate::llm_client::prompts::render;
use crate::llm_client::{invoke_structured, schemas, ModelGateway, ModelRequest};
use crate::review::prompts::{APPLY_PROMPT_TEMPLATE, APPLY_SYSTEM};
use crate::review::suggestions::Suggestion;

/// Returns the revised document. Callers skip this when nothing was approved.
pub async fn apply_edits(
    document: &str,
    approved: &[Suggestion],
    llm: &dyn ModelGateway,
) -> Result<String, AppError> {
    let edits_json = serde_json::to_string_pretty(approved)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize edits: {e}")))?;

    let prompt = render(
        APPLY_PROMPT_TEMPLATE,
        &[("document", document), ("edits_json", edits_json.as_str())],
    );
    let request = ModelRequest::new(APPLY_SYSTEM, prompt).with_schema(schemas::cv_markdown());

    let revised: CvMarkdown = invoke_structured(llm, &request)
        .await
        .map_err(|e| AppError::llm("Applying edits failed", e))?;

    info!("Applied {} approved edit(s)", approved.len());
    Ok(revised.cv_markdown)
}
