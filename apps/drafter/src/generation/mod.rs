// Document generation: job research, relevance scoring, content selection, composition.
// All LLM calls go through llm_client; no direct API calls here.

pub mod composer;
pub mod content_selector;
pub mod job;
pub mod prompts;
pub mod relevance;
