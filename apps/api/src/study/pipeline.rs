//! The shared request pipeline behind every AI study tool:
//! validate -> build prompt -> complete (with retry) -> extract -> decode.
//!
//! Tools differ only in their [`StudyTask`] strategy.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::extract::{extract, ExtractError, Extracted};
use crate::llm_client::LlmClient;
use crate::study::models::{FlashcardSet, QuizSet, StudyBuddyAnswer};
use crate::study::prompts;
use crate::study::TaskKind;

/// Per-tool strategy: which prompt to build and how to turn the model's output
/// into the response payload.
pub trait StudyTask {
    type Output: Serialize;

    const KIND: TaskKind;

    fn decode(extracted: Extracted) -> Result<Self::Output, ExtractError>;
}

pub struct Flashcards;
pub struct Quiz;
pub struct StudyBuddy;

impl StudyTask for Flashcards {
    type Output = FlashcardSet;
    const KIND: TaskKind = TaskKind::Flashcards;

    fn decode(extracted: Extracted) -> Result<FlashcardSet, ExtractError> {
        Ok(serde_json::from_value(structured(extracted)?)?)
    }
}

impl StudyTask for Quiz {
    type Output = QuizSet;
    const KIND: TaskKind = TaskKind::Quiz;

    /// Fails when the `quiz` field is missing or any question has a bad answer index.
    fn decode(extracted: Extracted) -> Result<QuizSet, ExtractError> {
        let set: QuizSet = serde_json::from_value(structured(extracted)?)?;
        if let Some(pos) = set.quiz.iter().position(|q| !q.is_well_formed()) {
            return Err(ExtractError::MalformedOutput(format!(
                "quiz question {pos} needs 4 options and a correct index in range"
            )));
        }
        Ok(set)
    }
}

impl StudyTask for StudyBuddy {
    type Output = StudyBuddyAnswer;
    const KIND: TaskKind = TaskKind::StudyBuddy;

    fn decode(extracted: Extracted) -> Result<StudyBuddyAnswer, ExtractError> {
        Ok(StudyBuddyAnswer {
            answer: plain_text(extracted)?,
        })
    }
}

fn structured(extracted: Extracted) -> Result<Value, ExtractError> {
    match extracted {
        Extracted::Structured(value) => Ok(value),
        Extracted::Text(_) => Err(ExtractError::MalformedOutput(
            "expected structured output".to_string(),
        )),
    }
}

fn plain_text(extracted: Extracted) -> Result<String, ExtractError> {
    match extracted {
        Extracted::Text(text) => Ok(text),
        Extracted::Structured(_) => Err(ExtractError::MalformedOutput(
            "expected plain text output".to_string(),
        )),
    }
}

/// Runs one tool end to end. Blank input is rejected before any upstream call.
pub async fn run_task<T: StudyTask>(
    llm: &LlmClient,
    input: Option<&str>,
) -> Result<T::Output, AppError> {
    let kind = T::KIND;
    let text = input
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::InputInvalid(kind.messages().input_required.to_string()))?;

    let prompt = prompts::build(kind, text);
    info!("{} request: {} chars of input", kind.label(), text.len());

    let response = llm
        .complete(&prompt.user, &prompt.system, prompt.response_schema.as_ref())
        .await
        .map_err(|source| AppError::UpstreamCallFailed { task: kind, source })?;

    extract(&response, prompt.format())
        .and_then(T::decode)
        .map_err(|e| match e {
            ExtractError::NoContent => AppError::NoContent { task: kind },
            ExtractError::MalformedOutput(detail) => AppError::MalformedOutput { task: kind, detail },
        })
}
