use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Every variant is fatal to the current attempt; `main` maps it to an exit code.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed model output: {0}")]
    MalformedModelOutput(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a gateway failure, keeping malformed payloads distinct from transport errors.
    pub fn llm(context: &str, err: LlmError) -> Self {
        if err.is_malformed_output() {
            AppError::MalformedModelOutput(format!("{context}: {err}"))
        } else {
            AppError::Llm(format!("{context}: {err}"))
        }
    }

    /// Stable machine-readable code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::MalformedModelOutput(_) => "MALFORMED_MODEL_OUTPUT",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Input(_) => "INPUT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Configuration(_) => 2,
            _ => 1,
        }
    }
}
