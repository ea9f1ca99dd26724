use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answer::AnswerMap;
use crate::model::ids::SessionId;

/// Lifecycle status stamped on a persisted response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Completed,
}

/// The persisted outcome of one survey session.
///
/// Built exactly once, at submission, and immutable afterwards. Skipped
/// questions are simply absent from `answers`; a partially answered survey is
/// a legal, persisted outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    session_id: SessionId,
    answers: AnswerMap,
    status: ResponseStatus,
    timestamp: DateTime<Utc>,
}

impl ResponseRecord {
    /// Snapshot the given answers into a completed record.
    #[must_use]
    pub fn completed(session_id: SessionId, answers: AnswerMap, timestamp: DateTime<Utc>) -> Self {
        Self {
            session_id,
            answers,
            status: ResponseStatus::Completed,
            timestamp,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
