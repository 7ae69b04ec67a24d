use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::study::TaskKind;

/// Handler-boundary error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    #[error("{} upstream call failed: {source}", .task.label())]
    UpstreamCallFailed {
        task: TaskKind,
        #[source]
        source: LlmError,
    },

    #[error("{} upstream returned no content", .task.label())]
    NoContent { task: TaskKind },

    #[error("{} upstream returned malformed output: {detail}", .task.label())]
    MalformedOutput { task: TaskKind, detail: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InputInvalid(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InputInvalid(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::UpstreamCallFailed { task, source } => {
                tracing::error!("{} API error: {source}", task.label());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    task.messages().upstream_failed.to_string(),
                )
            }
            AppError::NoContent { task } => {
                tracing::error!("{} API error: no content returned", task.label());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    task.messages().no_content.to_string(),
                )
            }
            AppError::MalformedOutput { task, detail } => {
                tracing::error!("Failed to parse structured JSON response: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    task.messages().malformed.to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
