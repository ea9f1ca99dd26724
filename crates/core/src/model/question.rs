use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("rating scale must be > 0")]
    InvalidScale,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set cannot be empty")]
    Empty,

    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Bounded integer scale, answered with a value in `[1, scale]` (e.g. 5 or 10).
    Rating { scale: u8 },
    /// Unconstrained text. An empty reply is legal.
    FreeText,
}

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    kind: QuestionKind,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the text is blank, or
    /// `QuestionError::InvalidScale` if a rating scale is zero.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if matches!(kind, QuestionKind::Rating { scale: 0 }) {
            return Err(QuestionError::InvalidScale);
        }
        Ok(Self { id, text, kind })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }
}

//
// ─── QUESTION SET ──────────────────────────────────────────────────────────────
//

/// Immutable ordered sequence of questions for one survey.
///
/// The order is fixed and identical for every respondent; sessions walk the
/// set by index and key answers by question id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Creates a validated question set.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSetError::Empty` for an empty sequence and
    /// `QuestionSetError::DuplicateId` when two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionSetError> {
        if questions.is_empty() {
            return Err(QuestionSetError::Empty);
        }
        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuestionSetError::DuplicateId(question.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Total number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the final question.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    /// Question at `index`, if within bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(id: u64, scale: u8) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            QuestionKind::Rating { scale },
        )
        .unwrap()
    }

    #[test]
    fn question_rejects_blank_text() {
        let err = Question::new(QuestionId::new(1), "   ", QuestionKind::FreeText).unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn question_rejects_zero_scale() {
        let err = Question::new(
            QuestionId::new(1),
            "How satisfied are you?",
            QuestionKind::Rating { scale: 0 },
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::InvalidScale);
    }

    #[test]
    fn empty_set_is_rejected() {
        let err = QuestionSet::new(Vec::new()).unwrap_err();
        assert_eq!(err, QuestionSetError::Empty);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = QuestionSet::new(vec![rating(1, 5), rating(1, 10)]).unwrap_err();
        assert_eq!(err, QuestionSetError::DuplicateId(QuestionId::new(1)));
    }

    #[test]
    fn set_preserves_order_and_exposes_last_index() {
        let set = QuestionSet::new(vec![rating(3, 5), rating(1, 5), rating(2, 10)]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.last_index(), 2);
        assert_eq!(set.get(0).unwrap().id(), QuestionId::new(3));
        assert_eq!(set.get(2).unwrap().id(), QuestionId::new(2));
        assert!(set.get(3).is_none());
    }
}
