//! Response extraction: provider envelope -> model text -> parsed value.

use serde_json::Value;
use thiserror::Error;

use super::GenerateContentResponse;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no content returned")]
    NoContent,

    #[error("malformed structured output: {0}")]
    MalformedOutput(String),
}

impl From<serde_json::Error> for ExtractError {
    fn from(e: serde_json::Error) -> Self {
        ExtractError::MalformedOutput(e.to_string())
    }
}

/// What the caller asked the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Structured(Value),
    Text(String),
}

/// Pulls the generated text out of `response` and, for JSON requests, parses it.
/// A missing or empty text field is `NoContent`; unparsable JSON is `MalformedOutput`.
pub fn extract(
    response: &GenerateContentResponse,
    format: ResponseFormat,
) -> Result<Extracted, ExtractError> {
    let text = response
        .text()
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::NoContent)?;

    match format {
        ResponseFormat::Text => Ok(Extracted::Text(text.to_string())),
        ResponseFormat::Json => {
            let value = serde_json::from_str(strip_json_fences(text))?;
            Ok(Extracted::Structured(value))
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped.trim_start())
}
