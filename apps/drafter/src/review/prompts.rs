// LLM prompt constants for the Review module.

/// System prompt for the suggestion engine.
pub const SUGGESTION_SYSTEM: &str = "You are a meticulous CV editor. \
    Propose small, concrete edits that improve a CV. \
    Each suggestion must be independently applicable.";

/// Suggestion prompt. Replace `{document}` before sending.
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"Review the following Markdown CV and propose edits.

DOCUMENT:
{document}

Rules:
- "category": one of clarity, typo, formatting, impact, consistency, tone, other
- "location": where in the document the edit applies (section heading or a short quote)
- "suggestion": the edit itself, stated precisely enough to apply without further context
- Return an empty list if the document needs no changes."#;

/// System prompt for the edit applier.
pub const APPLY_SYSTEM: &str = "You are a careful CV editor applying an approved list of edits. \
    Apply exactly the approved edits and nothing else.";

/// Apply prompt. Replace `{document}` and `{edits_json}`.
pub const APPLY_PROMPT_TEMPLATE: &str = r#"Apply the approved edits to the document below.

DOCUMENT:
{document}

APPROVED EDITS:
{edits_json}

HARD RULES:
1. Apply every approved edit
2. Do NOT add, remove, or reword anything the edits do not require
3. Keep the Markdown structure intact

Return the full revised document in "cv_markdown"."#;
