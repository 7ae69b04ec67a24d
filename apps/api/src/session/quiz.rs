use std::time::Duration;

use crate::study::models::QuizQuestion;

/// How long the chosen and correct answers stay highlighted before the quiz moves on.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// What the UI highlights right after an answer is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReveal {
    pub chosen: usize,
    pub correct: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// One pass through a generated quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    score: usize,
    finished: bool,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let finished = questions.is_empty();
        Self {
            questions,
            current: 0,
            selected: None,
            score: 0,
            finished,
        }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Locks in an answer for the current question. Only the first pick counts;
    /// later picks (and picks after the end) return `None`.
    pub fn select(&mut self, answer: usize) -> Option<AnswerReveal> {
        if self.selected.is_some() {
            return None;
        }
        let question = self.current()?;
        let reveal = AnswerReveal {
            chosen: answer,
            correct: question.correct,
            is_correct: answer == question.correct,
            explanation: question.explanation.clone(),
        };
        self.selected = Some(answer);
        Some(reveal)
    }

    /// Scores the locked-in answer and moves to the next question, or finishes.
    /// Does nothing until an answer is selected.
    pub fn advance(&mut self) {
        let Some(answer) = self.selected.take() else {
            return;
        };
        if self
            .questions
            .get(self.current)
            .is_some_and(|q| q.correct == answer)
        {
            self.score += 1;
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.finished = true;
        }
    }

    /// Selects, holds the reveal for [`REVEAL_DELAY`], then advances.
    /// The wait cannot be skipped or cancelled.
    pub async fn answer(&mut self, answer: usize) -> Option<AnswerReveal> {
        let reveal = self.select(answer)?;
        tokio::time::sleep(REVEAL_DELAY).await;
        self.advance();
        Some(reveal)
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    fn question(text: &str, correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            explanation: format!("{text} explained"),
        }
    }

    fn session() -> QuizSession {
        QuizSession::new(vec![question("q1", 0), question("q2", 2)])
    }

    #[test]
    fn test_only_first_selection_counts() {
        let mut quiz = session();
        let reveal = quiz.select(1).unwrap();
        assert!(!reveal.is_correct);
        assert_eq!(reveal.correct, 0);
        assert!(quiz.select(0).is_none());
        assert_eq!(quiz.selected(), Some(1));
    }

    #[test]
    fn test_advance_scores_and_finishes() {
        let mut quiz = session();
        quiz.select(0);
        quiz.advance();
        assert_eq!(quiz.position(), 1);
        assert_eq!(quiz.score(), 1);

        quiz.select(3);
        quiz.advance();
        assert!(quiz.is_finished());
        assert_eq!(quiz.score(), 1);
        assert!(quiz.current().is_none());
        assert!(quiz.select(0).is_none());
    }

    #[test]
    fn test_advance_without_selection_is_noop() {
        let mut quiz = session();
        quiz.advance();
        assert_eq!(quiz.position(), 0);
        assert!(!quiz.is_finished());
    }

    #[test]
    fn test_empty_quiz_is_finished() {
        let quiz = QuizSession::new(Vec::new());
        assert!(quiz.is_finished());
        assert!(quiz.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_waits_for_reveal_delay() {
        let mut quiz = session();
        let started = Instant::now();

        let reveal = quiz.answer(0).await.unwrap();

        assert!(reveal.is_correct);
        assert!(started.elapsed() >= REVEAL_DELAY);
        assert!(started.elapsed() < REVEAL_DELAY * 2);
        assert_eq!(quiz.position(), 1);
        assert_eq!(quiz.score(), 1);
    }
}
