use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;

/// A recorded answer to a single question.
///
/// Serializes untagged, so stored records carry the bare number or string the
/// respondent entered. Range checks against a rating question's scale are the
/// caller's contract and are not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Rating(u8),
    Text(String),
}

impl AnswerValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Answers collected so far, keyed by question id.
///
/// A missing key is the "no answer" state; there is no sentinel value for an
/// unanswered question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap {
    entries: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` under `id`, overwriting any earlier answer.
    pub fn record(&mut self, id: QuestionId, value: AnswerValue) {
        self.entries.insert(id, value);
    }

    /// Answer recorded for `id`, if any.
    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&AnswerValue> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &AnswerValue)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }
}
