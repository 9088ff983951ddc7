//! Output schemas declared at the model boundary.
//!
//! Every schema is a closed object: all properties required, nothing extra
//! allowed. `OutputSchema::parse` is the only place model JSON is validated.

use serde_json::{json, Map, Value};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, LlmError};
use crate::review::suggestions::SuggestionCategory;

/// A named JSON Schema a structured model answer must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub schema: Value,
}

impl OutputSchema {
    /// Builds a closed object schema whose properties are all required.
    fn closed_object(name: &'static str, properties: Value) -> Self {
        Self {
            name,
            schema: closed(properties),
        }
    }

    /// Instruction text telling the model which shape to answer in.
    pub fn contract(&self) -> String {
        format!(
            "{JSON_ONLY_SYSTEM}\nThe object (\"{}\") must validate against this JSON Schema:\n{}",
            self.name, self.schema
        )
    }

    /// Validates an already-parsed value.
    pub fn validate(&self, instance: &Value) -> Result<(), LlmError> {
        let validator =
            jsonschema::validator_for(&self.schema).map_err(|e| LlmError::InvalidSchema {
                schema: self.name.to_string(),
                message: e.to_string(),
            })?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LlmError::SchemaViolation {
                schema: self.name.to_string(),
                errors,
            })
        }
    }

    /// Parses raw model text (code fences tolerated) and validates it.
    pub fn parse(&self, text: &str) -> Result<Value, LlmError> {
        let value: Value = serde_json::from_str(strip_json_fences(text))?;
        self.validate(&value)?;
        Ok(value)
    }
}

fn closed(properties: Value) -> Value {
    let required: Vec<Value> = properties
        .as_object()
        .map(Map::keys)
        .into_iter()
        .flatten()
        .map(|k| Value::String(k.clone()))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

pub fn job_description() -> OutputSchema {
    OutputSchema::closed_object(
        "job_description",
        json!({
            "description": {"type": "string", "minLength": 1},
            "sources": {"type": "array", "items": {"type": "string"}}
        }),
    )
}

pub fn open_status() -> OutputSchema {
    OutputSchema::closed_object(
        "open_status",
        json!({
            "open": {"type": "boolean"},
            "confidence": {"type": "number", "minimum": 0.0, "maximum": 1.0}
        }),
    )
}

pub fn relevance_score() -> OutputSchema {
    OutputSchema::closed_object(
        "relevance_score",
        json!({
            "score": {"type": "integer", "minimum": 1, "maximum": 10},
            "rationale": {"type": "string"}
        }),
    )
}

pub fn cv_markdown() -> OutputSchema {
    OutputSchema::closed_object(
        "cv_markdown",
        json!({
            "cv_markdown": {"type": "string", "minLength": 1}
        }),
    )
}

pub fn suggestions() -> OutputSchema {
    let categories: Vec<&str> = SuggestionCategory::ALL.iter().map(|c| c.as_str()).collect();
    let item = closed(json!({
        "category": {"type": "string", "enum": categories},
        "location": {"type": "string"},
        "suggestion": {"type": "string"}
    }));

    OutputSchema::closed_object(
        "suggestions",
        json!({
            "suggestions": {"type": "array", "items": item}
        }),
    )
}

pub fn covering_letter() -> OutputSchema {
    OutputSchema::closed_object(
        "covering_letter",
        json!({
            "covering_letter": {"type": "string", "minLength": 1}
        }),
    )
}
