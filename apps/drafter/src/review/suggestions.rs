//! Suggestion Engine: asks the model for categorized edits to a document.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::render;
use crate::llm_client::{invoke_structured, schemas, ModelGateway, ModelRequest};
use crate::review::prompts::{SUGGESTION_PROMPT_TEMPLATE, SUGGESTION_SYSTEM};

/// Closed set of edit categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Clarity,
    Typo,
    Formatting,
    Impact,
    Consistency,
    Tone,
    Other,
}

impl SuggestionCategory {
    pub const ALL: [SuggestionCategory; 7] = [
        SuggestionCategory::Clarity,
        SuggestionCategory::Typo,
        SuggestionCategory::Formatting,
        SuggestionCategory::Impact,
        SuggestionCategory::Consistency,
        SuggestionCategory::Tone,
        SuggestionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::Clarity => "clarity",
            SuggestionCategory::Typo => "typo",
            SuggestionCategory::Formatting => "formatting",
            SuggestionCategory::Impact => "impact",
            SuggestionCategory::Consistency => "consistency",
            SuggestionCategory::Tone => "tone",
            SuggestionCategory::Other => "other",
        }
    }
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed edit. Only `suggestion` may change during review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub location: String,
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
struct SuggestionsPayload {
    suggestions: Vec<Suggestion>,
}

/// Proposes edits for `document`. An empty list means nothing to review.
pub async fn suggest(document: &str, llm: &dyn ModelGateway) -> Result<Vec<Suggestion>, AppError> {
    let prompt = render(SUGGESTION_PROMPT_TEMPLATE, &[("document", document)]);
    let request =
        ModelRequest::new(SUGGESTION_SYSTEM, prompt).with_schema(schemas::suggestions());

    let payload: SuggestionsPayload = invoke_structured(llm, &request)
        .await
        .map_err(|e| AppError::llm("Suggestion generation failed", e))?;

    info!("Model proposed {} suggestions", payload.suggestions.len());
    Ok(payload.suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    #[test]
    fn test_category_serde_is_lowercase() {
        for category in SuggestionCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[tokio::test]
    async fn test_suggest_parses_ordered_list() {
        let gateway = ScriptedGateway::replying(
            r#"{"suggestions": [
                {"category": "typo", "location": "Summary", "suggestion": "Fix 'recieve'"},
                {"category": "impact", "location": "Acme role", "suggestion": "Quantify the latency win"}
            ]}"#,
        );
        let suggestions = suggest("# CV", &gateway).await.unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, SuggestionCategory::Typo);
        assert_eq!(suggestions[1].location, "Acme role");
    }

    #[tokio::test]
    async fn test_suggest_empty_list() {
        let gateway = ScriptedGateway::replying(r#"{"suggestions": []}"#);
        assert!(suggest("# CV", &gateway).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_unknown_category_is_malformed() {
        let gateway = ScriptedGateway::replying(
            r#"{"suggestions": [{"category": "grammar", "location": "x", "suggestion": "y"}]}"#,
        );
        let err = suggest("# CV", &gateway).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedModelOutput(_)));
    }
}
