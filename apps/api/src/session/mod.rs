// Client-side view state for the AI tools.
// Nothing here is persisted; a new session starts from scratch.

pub mod chat;
pub mod flashcards;
pub mod quiz;

pub use chat::{ChatHistory, ChatTurn};
pub use flashcards::FlashcardDeck;
pub use quiz::{AnswerReveal, QuizSession, REVEAL_DELAY};
