//! StudyHub: AI study tools (flashcards, quiz, study buddy) behind a small
//! HTTP API, plus the client-side goal tracker and session state.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod planner;
pub mod routes;
pub mod session;
pub mod state;
pub mod study;
