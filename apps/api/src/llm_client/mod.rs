/// LLM Client — the single point of entry for all Gemini `generateContent` calls.
///
/// No other module talks to the provider directly. Handlers build a prompt,
/// hand it to [`LlmClient::complete`], and pull the text back out with
/// [`extract::extract`].
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;
pub mod prompts;
pub mod transport;

use transport::{Transport, TransportError};

/// Total attempts per completion, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("upstream call failed with status {status}")]
    Status { status: u16, body: String },

    #[error("no successful response after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

impl<'a> Content<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![Part { text }],
        }
    }
}

/// The provider envelope. Only the fields read downstream are modelled;
/// everything is optional because a 200 is not a promise of content.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Text at `candidates[0].content.parts[0].text`, if any.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

/// Wait after the 0-based `attempt` failed: 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Completion client shared by every study tool.
#[derive(Clone)]
pub struct LlmClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl LlmClient {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    /// Sends one completion request and returns the raw provider envelope.
    ///
    /// Transport failures and 429s are retried with exponential backoff, up to
    /// [`MAX_ATTEMPTS`] in total. Any other non-2xx status fails immediately.
    /// When `response_schema` is set the provider is asked for JSON output.
    pub async fn complete(
        &self,
        prompt: &str,
        system: &str,
        response_schema: Option<&Value>,
    ) -> Result<GenerateContentResponse, LlmError> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(prompt)],
            system_instruction: Content::text(system),
            generation_config: response_schema.map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };
        let body = serde_json::to_value(&request)?;

        for attempt in 0..MAX_ATTEMPTS {
            let is_last = attempt + 1 == MAX_ATTEMPTS;

            match self.transport.post_json(&self.endpoint, &body).await {
                Err(e) if is_last => return Err(LlmError::Transport(e)),
                Err(e) => {
                    warn!("LLM call attempt {} failed: {}", attempt + 1, e);
                }
                Ok(response) if response.status == 429 => {
                    warn!("LLM API rate limited on attempt {}", attempt + 1);
                    if is_last {
                        break;
                    }
                }
                Ok(response) if !response.is_success() => {
                    warn!("LLM API returned {}: {}", response.status, response.body);
                    return Err(LlmError::Status {
                        status: response.status,
                        body: response.body,
                    });
                }
                Ok(response) => {
                    let envelope: GenerateContentResponse = serde_json::from_str(&response.body)?;
                    if let Some(usage) = &envelope.usage_metadata {
                        debug!(
                            "LLM call succeeded: prompt_tokens={}, candidate_tokens={}",
                            usage.prompt_token_count, usage.candidates_token_count
                        );
                    }
                    return Ok(envelope);
                }
            }

            let delay = backoff_delay(attempt);
            debug!("Retrying LLM call after {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }

        Err(LlmError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}
