//! Axum route handlers for the AI study tools.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::study::models::{FlashcardSet, QuizSet, StudyBuddyAnswer};
use crate::study::pipeline::{run_task, Flashcards, Quiz, StudyBuddy};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

// Fields are optional so a missing field reaches validation and gets the
// tool's own message rather than a generic deserialization error.

#[derive(Debug, Deserialize)]
pub struct FlashcardsRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuizRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudyBuddyRequest {
    pub question: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/flashcards
pub async fn handle_flashcards(
    State(state): State<AppState>,
    body: Result<Json<FlashcardsRequest>, JsonRejection>,
) -> Result<Json<FlashcardSet>, AppError> {
    let Json(request) = body?;
    let set = run_task::<Flashcards>(&state.llm, request.notes.as_deref()).await?;
    Ok(Json(set))
}

/// POST /api/quiz
pub async fn handle_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizSet>, AppError> {
    let Json(request) = body?;
    let quiz = run_task::<Quiz>(&state.llm, request.text.as_deref()).await?;
    Ok(Json(quiz))
}

/// POST /api/study-buddy
pub async fn handle_study_buddy(
    State(state): State<AppState>,
    body: Result<Json<StudyBuddyRequest>, JsonRejection>,
) -> Result<Json<StudyBuddyAnswer>, AppError> {
    let Json(request) = body?;
    let answer = run_task::<StudyBuddy>(&state.llm, request.question.as_deref()).await?;
    Ok(Json(answer))
}
