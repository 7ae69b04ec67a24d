use serde::{Deserialize, Serialize};

/// Number of answer options every quiz question must carry.
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index into `options`.
    pub correct: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Exactly four options and `correct` pointing at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == QUIZ_OPTION_COUNT && self.correct < self.options.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyBuddyAnswer {
    pub answer: String,
}
