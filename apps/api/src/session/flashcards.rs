use crate::study::models::Flashcard;

/// A generated deck being studied one card at a time.
#[derive(Debug, Default, Clone)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    current: usize,
    flipped: bool,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            current: 0,
            flipped: false,
        }
    }

    /// Discards the deck, as "new session" does.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.current)
    }

    /// 0-based index of the visible card.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Moves forward; stays on the last card. Always shows the front.
    pub fn next_card(&mut self) -> bool {
        if self.current + 1 >= self.cards.len() {
            return false;
        }
        self.current += 1;
        self.flipped = false;
        true
    }

    /// Moves back; stays on the first card. Always shows the front.
    pub fn prev_card(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        self.flipped = false;
        true
    }
}
