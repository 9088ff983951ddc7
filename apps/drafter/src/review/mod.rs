// Suggestion review: the model proposes edits, the operator prunes them,
// and the approved set is merged back into the document.

pub mod applier;
pub mod prompts;
pub mod session;
pub mod suggestions;
