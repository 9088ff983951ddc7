use std::sync::Arc;

use crate::generation::relevance::{LlmRelevanceScorer, RelevanceScorer};
use crate::llm_client::ModelGateway;
use crate::output::Reporter;

/// Shared collaborators passed explicitly to every pipeline step.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn ModelGateway>,
    /// Pluggable relevance scorer. Default: LlmRelevanceScorer over `llm`.
    pub scorer: Arc<dyn RelevanceScorer>,
    pub reporter: Arc<dyn Reporter>,
}

impl AppState {
    pub fn new(llm: Arc<dyn ModelGateway>, reporter: Arc<dyn Reporter>) -> Self {
        let scorer = Arc::new(LlmRelevanceScorer(llm.clone()));
        Self {
            llm,
            scorer,
            reporter,
        }
    }
}
