//! Relevance Scoring: pluggable, trait-based scorer that rates one CV item
//! against the target job on a 1-10 scale.
//!
//! Default: `LlmRelevanceScorer`. Every call is an independent query; nothing
//! is cached, so the same item may score differently across runs.
//!
//! `AppState` holds an `Arc<dyn RelevanceScorer>`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::generation::job::JobDescription;
use crate::generation::prompts::{RELEVANCE_PROMPT_TEMPLATE, RELEVANCE_SYSTEM};
use crate::llm_client::prompts::render;
use crate::llm_client::{invoke_structured, schemas, ModelGateway, ModelRequest};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A score in `MIN_SCORE..=MAX_SCORE` with a one-sentence rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    #[serde(deserialize_with = "whole_score")]
    pub score: u8,
    pub rationale: String,
}

/// JSON Schema treats `7.0` as an integer, so the score is read as a number
/// and accepted when it is whole and fits in a `u8`.
fn whole_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(de::Error::custom(format!(
            "relevance score {value} is not a whole number in 0..=255"
        )))
    }
}

/// A piece of CV text with its relevance. The score is the only ranking key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub text: String,
    pub score: u8,
    pub rationale: String,
}

impl ScoredItem {
    pub fn new(text: impl Into<String>, relevance: Relevance) -> Self {
        Self {
            text: text.into(),
            score: relevance.score,
            rationale: relevance.rationale,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The relevance scorer trait. Implement this to swap backends without
/// touching the selection or orchestration code.
#[async_trait]
pub trait RelevanceScorer: Send + Sync {
    async fn score(&self, text: &str, job: &JobDescription) -> Result<Relevance, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmRelevanceScorer: default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Scores via the model with the `relevance_score` schema, which bounds the
/// score to 1-10.
pub struct LlmRelevanceScorer(pub Arc<dyn ModelGateway>);

#[async_trait]
impl RelevanceScorer for LlmRelevanceScorer {
    async fn score(&self, text: &str, job: &JobDescription) -> Result<Relevance, AppError> {
        let prompt = render(
            RELEVANCE_PROMPT_TEMPLATE,
            &[("item", text), ("job_description", job.description.as_str())],
        );
        let request =
            ModelRequest::new(RELEVANCE_SYSTEM, prompt).with_schema(schemas::relevance_score());

        let relevance: Relevance = invoke_structured(self.0.as_ref(), &request)
            .await
            .map_err(|e| AppError::llm("Relevance scoring failed", e))?;

        if !(MIN_SCORE..=MAX_SCORE).contains(&relevance.score) {
            return Err(AppError::MalformedModelOutput(format!(
                "Relevance score {} outside {MIN_SCORE}..={MAX_SCORE}",
                relevance.score
            )));
        }

        debug!(score = relevance.score, "Scored item");
        Ok(relevance)
    }
}

/// Scores each text in order, one call at a time. Output order matches input order.
pub async fn score_all(
    scorer: &dyn RelevanceScorer,
    texts: &[String],
    job: &JobDescription,
) -> Result<Vec<ScoredItem>, AppError> {
    let mut scored = Vec::with_capacity(texts.len());
    for text in texts {
        let relevance = scorer.score(text, job).await?;
        scored.push(ScoredItem::new(text.as_str(), relevance));
    }
    Ok(scored)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    fn job() -> JobDescription {
        JobDescription {
            description: "Rust storage engineer".to_string(),
            sources: vec![],
        }
    }

    fn scorer_replying(text: &str) -> (Arc<ScriptedGateway>, LlmRelevanceScorer) {
        let gateway = Arc::new(ScriptedGateway::replying(text));
        let scorer = LlmRelevanceScorer(gateway.clone());
        (gateway, scorer)
    }

    #[tokio::test]
    async fn test_llm_scorer_returns_score_and_rationale() {
        let (gateway, scorer) =
            scorer_replying(r#"{"score": 8, "rationale": "Directly matches the Rust requirement."}"#);
        let relevance = scorer.score("Rust", &job()).await.unwrap();
        assert_eq!(relevance.score, 8);
        assert_eq!(relevance.rationale, "Directly matches the Rust requirement.");

        let prompt = gateway.last_prompt_for("relevance_score").unwrap();
        assert!(prompt.contains("Rust storage engineer"));
    }

    #[tokio::test]
    async fn test_whole_float_score_is_accepted() {
        let (_, scorer) = scorer_replying(r#"{"score": 7.0, "rationale": "Close fit."}"#);
        let relevance = scorer.score("Rust", &job()).await.unwrap();
        assert_eq!(relevance.score, 7);
    }

    #[test]
    fn test_fractional_score_does_not_deserialize() {
        let parsed: Result<Relevance, _> =
            serde_json::from_str(r#"{"score": 7.5, "rationale": "r"}"#);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_item_text_is_not_expanded_as_a_placeholder() {
        let (gateway, scorer) = scorer_replying(r#"{"score": 4, "rationale": "Some overlap."}"#);
        scorer
            .score("Wrote {job_description} parser", &job())
            .await
            .unwrap();

        let prompt = gateway.last_prompt_for("relevance_score").unwrap();
        assert!(prompt.contains("Wrote {job_description} parser"));
        assert_eq!(prompt.matches("Rust storage engineer").count(), 1);
    }

    #[tokio::test]
    async fn test_score_above_ten_is_malformed() {
        let (_, scorer) = scorer_replying(r#"{"score": 11, "rationale": "Too keen."}"#);
        let err = scorer.score("Rust", &job()).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedModelOutput(_)));
    }

    #[tokio::test]
    async fn test_score_below_one_is_malformed() {
        let (_, scorer) = scorer_replying(r#"{"score": 0, "rationale": "Irrelevant."}"#);
        let err = scorer.score("Knitting", &job()).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedModelOutput(_)));
    }

    #[tokio::test]
    async fn test_every_call_is_a_fresh_query() {
        let (gateway, scorer) = scorer_replying(r#"{"score": 5, "rationale": "Okay."}"#);
        scorer.score("Rust", &job()).await.unwrap();
        scorer.score("Rust", &job()).await.unwrap();
        assert_eq!(gateway.calls_for("relevance_score"), 2);
    }

    #[tokio::test]
    async fn test_score_all_preserves_input_order() {
        let gateway = Arc::new(ScriptedGateway::new(|request| {
            let prompt = &request.messages[0].content;
            let score = if prompt.contains("alpha") { 2 } else { 9 };
            Ok(format!(r#"{{"score": {score}, "rationale": "r"}}"#))
        }));
        let scorer = LlmRelevanceScorer(gateway);
        let texts = vec!["alpha".to_string(), "beta".to_string()];

        let scored = score_all(&scorer, &texts, &job()).await.unwrap();
        assert_eq!(scored[0].text, "alpha");
        assert_eq!(scored[0].score, 2);
        assert_eq!(scored[1].text, "beta");
        assert_eq!(scored[1].score, 9);
    }
}
