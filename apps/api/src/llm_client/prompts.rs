// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Opening instruction that pins the model to a single JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "output ONLY valid JSON matching this exact schema. \
Do not add markdown, comments, or explanations.";

/// Trailer appended after the candidate material in every prompt.
pub const JSON_ONLY_TRAILER: &str = "Respond with valid JSON only, no markdown.";
