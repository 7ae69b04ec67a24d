// AI study tools: flashcards, quiz, study buddy.
// Implements: prompt building, the shared completion pipeline, and the HTTP handlers.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod prompts;

/// The three AI tools. Each one picks its own prompt, schema, and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Flashcards,
    Quiz,
    StudyBuddy,
}

/// User-facing error messages for one tool.
#[derive(Debug, Clone, Copy)]
pub struct TaskMessages {
    pub input_required: &'static str,
    pub no_content: &'static str,
    pub malformed: &'static str,
    pub upstream_failed: &'static str,
}

const MALFORMED: &str = "LLM returned invalid JSON structure";

impl TaskKind {
    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Flashcards => "Flashcards",
            TaskKind::Quiz => "Quiz",
            TaskKind::StudyBuddy => "Study Buddy",
        }
    }

    pub fn messages(self) -> TaskMessages {
        match self {
            TaskKind::Flashcards => TaskMessages {
                input_required: "Notes are required",
                no_content: "No content returned from LLM",
                malformed: MALFORMED,
                upstream_failed: "Failed to generate flashcards due to internal server error.",
            },
            TaskKind::Quiz => TaskMessages {
                input_required: "Text is required to generate a quiz",
                no_content: "No content returned from LLM",
                malformed: MALFORMED,
                upstream_failed: "Failed to generate quiz due to internal server error.",
            },
            TaskKind::StudyBuddy => TaskMessages {
                input_required: "Question is required",
                no_content: "No content returned from Study Buddy",
                malformed: MALFORMED,
                upstream_failed: "Failed to get study buddy response due to internal server error.",
            },
        }
    }
}
