/// LLM Client: the single point of entry for all model calls in drafter.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Components receive a `&dyn ModelGateway` and go through `invoke` /
/// `invoke_structured`, which own schema validation.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod prompts;
pub mod schemas;

pub use schemas::OutputSchema;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("response does not match schema '{schema}': {}", errors.join("; "))]
    SchemaViolation { schema: String, errors: Vec<String> },

    #[error("schema '{schema}' is not a valid JSON Schema: {message}")]
    InvalidSchema { schema: String, message: String },
}

impl LlmError {
    /// True when the model answered but its payload could not be used.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            LlmError::Parse(_) | LlmError::EmptyContent | LlmError::SchemaViolation { .. }
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway contract
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One model invocation: optional system instructions, the conversation, and
/// an optional schema the answer must satisfy.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub instructions: Option<String>,
    pub messages: Vec<Message>,
    pub schema: Option<OutputSchema>,
}

impl ModelRequest {
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: Some(instructions.into()),
            messages: vec![Message::user(prompt)],
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: OutputSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn schema_name(&self) -> Option<&'static str> {
        self.schema.as_ref().map(|s| s.name)
    }

    /// System prompt as sent on the wire: instructions followed by the schema contract.
    pub fn system_prompt(&self) -> Option<String> {
        match (&self.instructions, &self.schema) {
            (None, None) => None,
            (Some(instructions), None) => Some(instructions.clone()),
            (None, Some(schema)) => Some(schema.contract()),
            (Some(instructions), Some(schema)) => {
                Some(format!("{instructions}\n\n{}", schema.contract()))
            }
        }
    }
}

/// Result of `invoke`: opaque text when no schema was declared, a validated
/// JSON value otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Text(String),
    Structured(Value),
}

/// A text-generation backend. `LlmClient` is the production implementation;
/// tests substitute scripted gateways.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends one request and returns the model's raw text answer.
    async fn complete(&self, request: &ModelRequest) -> Result<String, LlmError>;
}

/// Runs a request through the gateway and validates the answer against the
/// request's schema, if any. Nothing is retried.
pub async fn invoke(
    gateway: &dyn ModelGateway,
    request: &ModelRequest,
) -> Result<ModelOutput, LlmError> {
    let text = gateway.complete(request).await?;
    match &request.schema {
        None => Ok(ModelOutput::Text(text)),
        Some(schema) => schema.parse(&text).map(ModelOutput::Structured),
    }
}

/// `invoke` followed by deserialization into `T`.
pub async fn invoke_structured<T: DeserializeOwned>(
    gateway: &dyn ModelGateway,
    request: &ModelRequest,
) -> Result<T, LlmError> {
    let value = match invoke(gateway, request).await? {
        ModelOutput::Structured(value) => value,
        ModelOutput::Text(text) => serde_json::from_str(strip_json_fences(&text))?,
    };
    serde_json::from_value(value).map_err(LlmError::Parse)
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API client
// ────────────────────────────────────────────────────────────────────────────

/// Model, sampling temperature, and output budget for every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The single LLM client used by all components in drafter.
/// Wraps the Anthropic Messages API; a transport or API failure is returned
/// to the caller as-is.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    settings: ModelSettings,
    log_payloads: bool,
}

impl LlmClient {
    pub fn new(api_key: String, settings: ModelSettings) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            base_url: ANTHROPIC_API_URL.to_string(),
            settings,
            log_payloads: false,
        })
    }

    /// Points the client at a different API host.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Logs every request/response body at debug level when enabled.
    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(&self, request: &ModelRequest) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: request.system_prompt(),
            messages: &request.messages,
        };

        if self.log_payloads {
            debug!(
                schema = request.schema_name().unwrap_or("text"),
                request = %serde_json::to_string(&request_body)?,
                "LLM request"
            );
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if self.log_payloads {
            debug!(status = status.as_u16(), response = %body, "LLM response");
        }

        if !status.is_success() {
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = serde_json::from_str(&body)?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl ModelGateway for LlmClient {
    async fn complete(&self, request: &ModelRequest) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub(crate) fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
