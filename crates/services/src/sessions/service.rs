use chrono::{DateTime, Utc};
use std::fmt;

use survey_core::model::{
    AnswerMap, AnswerValue, Question, QuestionSet, ResponseRecord, SessionId,
};

use super::progress::SurveyProgress;
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a survey session.
///
/// `ConfirmPending` is a modal sub-state reachable only from the final
/// question while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    NotStarted,
    Answering,
    ConfirmPending,
    Completed,
}

impl fmt::Display for SurveyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SurveyPhase::NotStarted => "not started",
            SurveyPhase::Answering => "answering",
            SurveyPhase::ConfirmPending => "awaiting confirmation",
            SurveyPhase::Completed => "completed",
        };
        f.write_str(label)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one respondent's pass through the survey.
///
/// Walks an immutable question set by index, collecting answers keyed by
/// question id. Persistence and the completion reset are orchestrated by
/// `SurveyRunner`; this type only mutates its own state.
pub struct SurveySession {
    questions: QuestionSet,
    phase: SurveyPhase,
    current: usize,
    answers: AnswerMap,
    session_id: SessionId,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl SurveySession {
    /// Create a session over the given question set.
    ///
    /// The session begins in `NotStarted` with a freshly issued identifier.
    #[must_use]
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            questions,
            phase: SurveyPhase::NotStarted,
            current: 0,
            answers: AnswerMap::new(),
            session_id: SessionId::generate(),
            started_at: None,
            completed_at: None,
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            phase: self.phase,
        }
    }

    /// Begin answering.
    ///
    /// `now` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::NotStarted {
            return Err(self.invalid("start"));
        }
        self.phase = SurveyPhase::Answering;
        self.current = 0;
        self.answers.clear();
        self.started_at = Some(now);
        self.completed_at = None;
        Ok(())
    }

    /// Record `value` for the current question, overwriting any earlier answer.
    ///
    /// Re-answering is always allowed. Range and kind checks against the
    /// question are the caller's contract.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn record_answer(&mut self, value: AnswerValue) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::Answering {
            return Err(self.invalid("record_answer"));
        }
        let Some(id) = self.current_question().map(Question::id) else {
            return Err(self.invalid("record_answer"));
        };
        self.answers.record(id, value);
        Ok(())
    }

    fn advance(&mut self, operation: &'static str) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::Answering {
            return Err(SessionError::InvalidTransition {
                operation,
                phase: self.phase,
            });
        }
        if self.current < self.questions.last_index() {
            self.current += 1;
        }
        Ok(())
    }

    /// Advance to the next question.
    ///
    /// A no-op on the final question; submission goes through
    /// `request_submit` instead. The current question does not need an
    /// answer to advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn go_next(&mut self) -> Result<(), SessionError> {
        self.advance("go_next")
    }

    /// Step back to the previous question. A no-op at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn go_previous(&mut self) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::Answering {
            return Err(self.invalid("go_previous"));
        }
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Advance without answering. Any answer already recorded for the current
    /// question is kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        self.advance("skip")
    }

    /// Ask for submission confirmation from the final question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAtFinalQuestion` when invoked before the
    /// final question, or `SessionError::InvalidTransition` outside
    /// `Answering`.
    pub fn request_submit(&mut self) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::Answering {
            return Err(self.invalid("request_submit"));
        }
        let last = self.questions.last_index();
        if self.current != last {
            return Err(SessionError::NotAtFinalQuestion {
                current: self.current,
                last,
            });
        }
        self.phase = SurveyPhase::ConfirmPending;
        Ok(())
    }

    /// Dismiss the confirmation prompt and return to answering.
    ///
    /// The current index and all answers are untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `ConfirmPending`.
    pub fn cancel_submit(&mut self) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::ConfirmPending {
            return Err(self.invalid("cancel_submit"));
        }
        self.phase = SurveyPhase::Answering;
        Ok(())
    }

    /// Snapshot the collected answers into a completed response record.
    ///
    /// Pure: the session itself only moves to `Completed` through
    /// `mark_completed`, after the record has been persisted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `ConfirmPending`.
    pub fn build_record(&self, submitted_at: DateTime<Utc>) -> Result<ResponseRecord, SessionError> {
        if self.phase != SurveyPhase::ConfirmPending {
            return Err(self.invalid("build_record"));
        }
        Ok(ResponseRecord::completed(
            self.session_id.clone(),
            self.answers.clone(),
            submitted_at,
        ))
    }

    pub(crate) fn mark_completed(&mut self, completed_at: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != SurveyPhase::ConfirmPending {
            return Err(self.invalid("mark_completed"));
        }
        self.phase = SurveyPhase::Completed;
        self.completed_at = Some(completed_at);
        Ok(())
    }

    /// Clear the session for the next respondent and issue a fresh identifier.
    pub(crate) fn reset(&mut self) {
        self.phase = SurveyPhase::NotStarted;
        self.current = 0;
        self.answers.clear();
        self.session_id = SessionId::generate();
        self.started_at = None;
        self.completed_at = None;
    }

    #[must_use]
    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Total number of questions in the survey.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Question currently presented, while answering or confirming.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SurveyPhase::Answering | SurveyPhase::ConfirmPending => {
                self.questions.get(self.current)
            }
            SurveyPhase::NotStarted | SurveyPhase::Completed => None,
        }
    }

    /// Answer recorded for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&AnswerValue> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id()))
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn is_confirm_pending(&self) -> bool {
        self.phase == SurveyPhase::ConfirmPending
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SurveyProgress {
        SurveyProgress {
            total: self.total_questions(),
            answered: self.answers.len(),
            current: self.current,
            is_complete: self.phase == SurveyPhase::Completed,
        }
    }
}

impl fmt::Debug for SurveySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurveySession")
            .field("session_id", &self.session_id)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("questions_len", &self.questions.len())
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::model::{QuestionId, QuestionKind};
    use survey_core::time::fixed_now;

    fn build_questions() -> QuestionSet {
        let questions = vec![
            Question::new(
                QuestionId::new(1),
                "How satisfied are you with our products?",
                QuestionKind::Rating { scale: 5 },
            )
            .unwrap(),
            Question::new(
                QuestionId::new(2),
                "How fair are the prices compared to similar retailers?",
                QuestionKind::Rating { scale: 5 },
            )
            .unwrap(),
            Question::new(
                QuestionId::new(3),
                "What could we do to improve our service?",
                QuestionKind::FreeText,
            )
            .unwrap(),
        ];
        QuestionSet::new(questions).unwrap()
    }

    fn started_session() -> SurveySession {
        let mut session = SurveySession::new(build_questions());
        session.start(fixed_now()).unwrap();
        session
    }

    #[test]
    fn new_session_is_not_started() {
        let session = SurveySession::new(build_questions());
        assert_eq!(session.phase(), SurveyPhase::NotStarted);
        assert!(session.current_question().is_none());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn start_enters_answering_at_the_first_question() {
        let session = started_session();
        assert_eq!(session.phase(), SurveyPhase::Answering);
        assert_eq!(session.current_index(), 0);
        assert_eq!(
            session.current_question().unwrap().id(),
            QuestionId::new(1)
        );
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = started_session();
        let err = session.start(fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
        assert_eq!(session.phase(), SurveyPhase::Answering);
    }

    #[test]
    fn navigation_stays_within_bounds() {
        let mut session = started_session();

        session.go_previous().unwrap();
        assert_eq!(session.current_index(), 0);

        for _ in 0..10 {
            session.go_next().unwrap();
        }
        assert_eq!(session.current_index(), 2);

        session.go_previous().unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn recorded_answer_reads_back_and_overwrites() {
        let mut session = started_session();

        session.record_answer(AnswerValue::Rating(2)).unwrap();
        assert_eq!(session.current_answer(), Some(&AnswerValue::Rating(2)));

        session.record_answer(AnswerValue::Rating(5)).unwrap();
        assert_eq!(session.current_answer(), Some(&AnswerValue::Rating(5)));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn skip_keeps_an_existing_answer_and_advances() {
        let mut session = started_session();
        session.record_answer(AnswerValue::Rating(4)).unwrap();

        session.skip().unwrap();
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.current_answer(), None);

        session.go_previous().unwrap();
        assert_eq!(session.current_answer(), Some(&AnswerValue::Rating(4)));
    }

    #[test]
    fn skipped_question_stays_unanswered_when_revisited() {
        let mut session = started_session();
        session.skip().unwrap();
        session.go_previous().unwrap();
        assert_eq!(session.current_answer(), None);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn request_submit_before_the_final_question_is_rejected() {
        let mut session = started_session();
        let err = session.request_submit().unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotAtFinalQuestion { current: 0, last: 2 }
        ));
        assert_eq!(session.phase(), SurveyPhase::Answering);
    }

    #[test]
    fn request_submit_from_the_final_question_enters_confirm_pending() {
        let mut session = started_session();
        session.go_next().unwrap();
        session.go_next().unwrap();

        session.request_submit().unwrap();
        assert!(session.is_confirm_pending());
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn cancel_submit_returns_to_answering_unchanged() {
        let mut session = started_session();
        session.record_answer(AnswerValue::Rating(3)).unwrap();
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.request_submit().unwrap();

        session.cancel_submit().unwrap();
        assert_eq!(session.phase(), SurveyPhase::Answering);
        assert_eq!(session.current_index(), 2);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn navigation_is_rejected_while_confirm_pending() {
        let mut session = started_session();
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.request_submit().unwrap();

        assert!(matches!(
            session.go_next(),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            session.record_answer(AnswerValue::Rating(1)),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(session.is_confirm_pending());
    }

    #[test]
    fn build_record_snapshots_partial_answers() {
        let mut session = started_session();
        session.record_answer(AnswerValue::Rating(3)).unwrap();
        session.skip().unwrap();
        session.go_next().unwrap();
        session
            .record_answer(AnswerValue::text("faster shipping"))
            .unwrap();
        session.request_submit().unwrap();

        let record = session.build_record(fixed_now()).unwrap();
        assert_eq!(record.session_id(), session.session_id());
        assert_eq!(record.answers().len(), 2);
        assert!(record.answers().get(QuestionId::new(2)).is_none());
        assert_eq!(record.timestamp(), fixed_now());
    }

    #[test]
    fn build_record_outside_confirm_pending_is_rejected() {
        let session = started_session();
        assert!(matches!(
            session.build_record(fixed_now()),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn mark_completed_then_reset_issues_a_fresh_identifier() {
        let mut session = started_session();
        let first_id = session.session_id().clone();
        session.record_answer(AnswerValue::Rating(3)).unwrap();
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.request_submit().unwrap();

        session.mark_completed(fixed_now()).unwrap();
        assert_eq!(session.phase(), SurveyPhase::Completed);
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.progress().is_complete);

        session.reset();
        assert_eq!(session.phase(), SurveyPhase::NotStarted);
        assert_eq!(session.current_index(), 0);
        assert!(session.answers().is_empty());
        assert_ne!(session.session_id(), &first_id);
    }

    #[test]
    fn record_answer_is_rejected_once_completed() {
        let mut session = started_session();
        session.go_next().unwrap();
        session.go_next().unwrap();
        session.request_submit().unwrap();
        session.mark_completed(fixed_now()).unwrap();

        let err = session.record_answer(AnswerValue::Rating(1)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn progress_tracks_answered_count() {
        let mut session = started_session();
        assert_eq!(
            session.progress(),
            SurveyProgress {
                total: 3,
                answered: 0,
                current: 0,
                is_complete: false,
            }
        );

        session.record_answer(AnswerValue::Rating(4)).unwrap();
        session.go_next().unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.current, 1);
    }
}
