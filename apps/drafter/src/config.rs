use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::ModelSettings;

/// Process configuration loaded from environment variables (and `.env`).
/// Fails before any model call if the credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub model: ModelSettings,
    /// Raw `RUST_LOG` directives, if set.
    pub rust_log: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = ModelSettings::default();

        Ok(Config {
            anthropic_api_key: require(&lookup, "ANTHROPIC_API_KEY")?,
            model: ModelSettings {
                model: lookup("DRAFTER_MODEL").unwrap_or(defaults.model),
                temperature: parse_or(&lookup, "DRAFTER_TEMPERATURE", defaults.temperature)?,
                max_tokens: parse_or(&lookup, "DRAFTER_MAX_TOKENS", defaults.max_tokens)?,
            },
            rust_log: lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            AppError::Configuration(format!("Required environment variable '{key}' is not set"))
        })
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            AppError::Configuration(format!("{key} has an invalid value: '{raw}'"))
        }),
    }
}

/// Retry and scheduling settings, read from the run-configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RunConfig {
    pub min_reapply_days: u32,
    pub max_reapply_days: u32,
    pub max_attempts: u32,
    pub daemon: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            min_reapply_days: 7,
            max_reapply_days: 14,
            max_attempts: 1,
            daemon: false,
        }
    }
}

impl RunConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let config: RunConfig = serde_json::from_str(raw)
            .map_err(|e| AppError::Configuration(format!("Invalid run configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the run configuration; a missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::from_json_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No run configuration at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(AppError::Configuration(format!(
                "Failed to read run configuration {}: {e}",
                path.display()
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_reapply_days > self.max_reapply_days {
            return Err(AppError::Configuration(format!(
                "minReapplyDays ({}) must not exceed maxReapplyDays ({})",
                self.min_reapply_days, self.max_reapply_days
            )));
        }
        if self.max_attempts == 0 {
            return Err(AppError::Configuration(
                "maxAttempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
