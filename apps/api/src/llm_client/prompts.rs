// Shared prompt fragments.
// Each tool defines its own prompts next to it; this file holds cross-cutting pieces.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_SUFFIX: &str = "Do not include any text outside the JSON object.";
