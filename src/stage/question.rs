//! Quiz questions and where they come from

use serde::{Deserialize, Serialize};

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// 1-based index into `options`
    pub correct_answer: usize,
}

impl Question {
    /// Placeholder question shipped with the default tuning
    pub fn sample() -> Self {
        Self {
            prompt: "apakah ini pertanyaan?".to_string(),
            options: vec!["ya".to_string(), "tidak".to_string()],
            correct_answer: 1,
        }
    }

    /// Whether the option at 0-based `index` is the right one
    pub fn is_correct(&self, index: usize) -> bool {
        index + 1 == self.correct_answer
    }
}

/// Supplies the quiz with questions one at a time
pub trait QuestionSource {
    /// The question currently on offer
    fn current(&self) -> Option<&Question>;

    /// Move to the next question; false if there is none
    fn advance(&mut self) -> bool;

    /// True when no question follows the current one
    fn is_exhausted(&self) -> bool;

    /// Back to the first question (new quiz session)
    fn rewind(&mut self);
}

/// Fixed, ordered list of questions
#[derive(Debug, Clone, Default)]
pub struct QuestionDeck {
    questions: Vec<Question>,
    cursor: usize,
}

impl QuestionDeck {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionSource for QuestionDeck {
    fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn is_exhausted(&self) -> bool {
        self.cursor + 1 >= self.questions.len()
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_correct_index_is_one_based() {
        let q = Question::sample();
        assert!(q.is_correct(0));
        assert!(!q.is_correct(1));
    }

    #[test]
    fn test_deck_walks_and_rewinds() {
        let second = Question {
            prompt: "second".to_string(),
            options: vec!["a".to_string()],
            correct_answer: 1,
        };
        let mut deck = QuestionDeck::new(vec![Question::sample(), second]);
        assert!(!deck.is_exhausted());
        assert!(deck.advance());
        assert_eq!(deck.current().unwrap().prompt, "second");
        assert!(deck.is_exhausted());
        assert!(!deck.advance());
        deck.rewind();
        assert_eq!(deck.current(), Some(&Question::sample()));
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = QuestionDeck::new(Vec::new());
        assert!(deck.current().is_none());
        assert!(deck.is_exhausted());
        assert!(!deck.advance());
    }
}
