// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Opening line for every prompt whose reply is parsed as JSON.
pub const JSON_ONLY_PREAMBLE: &str = "You must respond with ONLY a valid JSON object, no other text.";
