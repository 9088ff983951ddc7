//! Job research: fetches the description for a job target and checks whether
//! the opening still accepts applications.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::{
    JOB_RESEARCH_PROMPT_TEMPLATE, JOB_RESEARCH_SYSTEM, OPEN_STATUS_PROMPT_TEMPLATE,
    OPEN_STATUS_SYSTEM,
};
use crate::llm_client::prompts::render;
use crate::llm_client::{invoke_structured, schemas, ModelGateway, ModelRequest};
use crate::models::job::JobTarget;

/// Full description of the target job plus the sources the model cited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub description: String,
    pub sources: Vec<String>,
}

/// Whether the opening accepts applications, with the model's confidence (0.0 to 1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenStatus {
    pub open: bool,
    pub confidence: f64,
}

/// Looks up the job posting for `target`.
pub async fn describe_job(
    target: &JobTarget,
    llm: &dyn ModelGateway,
) -> Result<JobDescription, AppError> {
    let prompt = render(JOB_RESEARCH_PROMPT_TEMPLATE, &[("job_target", target.as_str())]);
    let request =
        ModelRequest::new(JOB_RESEARCH_SYSTEM, prompt).with_schema(schemas::job_description());

    invoke_structured::<JobDescription>(llm, &request)
        .await
        .map_err(|e| AppError::llm("Job research failed", e))
}

/// Asks whether the job described by `description` is still open.
pub async fn check_open(
    target: &JobTarget,
    description: &JobDescription,
    llm: &dyn ModelGateway,
) -> Result<OpenStatus, AppError> {
    let prompt = render(
        OPEN_STATUS_PROMPT_TEMPLATE,
        &[
            ("job_target", target.as_str()),
            ("job_description", description.description.as_str()),
        ],
    );
    let request = ModelRequest::new(OPEN_STATUS_SYSTEM, prompt).with_schema(schemas::open_status());

    invoke_structured::<OpenStatus>(llm, &request)
        .await
        .map_err(|e| AppError::llm("Open-status check failed", e))
}
