use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use storage::repository::{ResponseStore, StorageError};
use survey_core::Clock;
use survey_core::model::{AnswerValue, Question, QuestionSet, SessionId, SurveySettings};

use super::progress::SurveyProgress;
use super::service::{SurveyPhase, SurveySession};
use crate::error::SessionError;

/// Outcome of a confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub session_id: SessionId,
    pub submitted_at: DateTime<Utc>,
}

/// Drives the single active survey session.
///
/// Presentation layers invoke the navigation operations and re-render from
/// the read accessors; `confirm_submit` persists the response record and
/// schedules the delayed reset that readies the session for the next
/// respondent.
pub struct SurveyRunner {
    clock: Clock,
    store: Arc<dyn ResponseStore>,
    settings: SurveySettings,
    session: Arc<Mutex<SurveySession>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl SurveyRunner {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn ResponseStore>, questions: QuestionSet) -> Self {
        Self::with_settings(clock, store, questions, SurveySettings::default())
    }

    #[must_use]
    pub fn with_settings(
        clock: Clock,
        store: Arc<dyn ResponseStore>,
        questions: QuestionSet,
        settings: SurveySettings,
    ) -> Self {
        Self {
            clock,
            store,
            settings,
            session: Arc::new(Mutex::new(SurveySession::new(questions))),
            reset_task: Mutex::new(None),
        }
    }

    // A poisoned lock only means a caller panicked mid-borrow; the session
    // state itself is updated atomically per operation.
    fn session(&self) -> MutexGuard<'_, SurveySession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Begin the survey for the current respondent.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `NotStarted`.
    pub fn start(&self) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.session().start(now)
    }

    /// Record an answer for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn record_answer(&self, value: AnswerValue) -> Result<(), SessionError> {
        self.session().record_answer(value)
    }

    /// Advance to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn go_next(&self) -> Result<(), SessionError> {
        self.session().go_next()
    }

    /// Step back to the previous question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn go_previous(&self) -> Result<(), SessionError> {
        self.session().go_previous()
    }

    /// Advance without answering the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `Answering`.
    pub fn skip(&self) -> Result<(), SessionError> {
        self.session().skip()
    }

    /// Ask for submission confirmation from the final question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAtFinalQuestion` before the final question,
    /// or `SessionError::InvalidTransition` outside `Answering`.
    pub fn request_submit(&self) -> Result<(), SessionError> {
        self.session().request_submit()
    }

    /// Dismiss the confirmation prompt and return to answering.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `ConfirmPending`.
    pub fn cancel_submit(&self) -> Result<(), SessionError> {
        self.session().cancel_submit()
    }

    /// Persist the confirmed response and complete the session.
    ///
    /// Exactly one record is written per session identifier. On a storage
    /// failure the error surfaces and the session stays in `ConfirmPending`,
    /// so the respondent can retry; no partial record exists. On success the
    /// session moves to `Completed` and the delayed reset is scheduled.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless the session is
    /// `ConfirmPending`, and `SessionError::Storage` if the store rejects the
    /// write.
    pub async fn confirm_submit(&self) -> Result<SubmitOutcome, SessionError> {
        let submitted_at = self.clock.now();
        let (session_id, payload) = {
            let session = self.session();
            let record = session.build_record(submitted_at)?;
            let payload = serde_json::to_string(&record)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            (session.session_id().clone(), payload)
        };

        self.store.put(session_id.as_str(), &payload).await?;

        self.session().mark_completed(submitted_at)?;
        self.schedule_reset(session_id.clone());

        Ok(SubmitOutcome {
            session_id,
            submitted_at,
        })
    }

    /// One-shot delayed reset back to `NotStarted` for the next respondent.
    ///
    /// Scheduling again aborts the previous task, and the task itself only
    /// resets the session it was scheduled for; a stale timer never clobbers
    /// a session that has already moved on.
    fn schedule_reset(&self, completed_id: SessionId) {
        let session = Arc::clone(&self.session);
        let delay = self.settings.completion_reset_delay();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.phase() == SurveyPhase::Completed && guard.session_id() == &completed_id {
                guard.reset();
            }
        });

        let mut slot = self
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    #[must_use]
    pub fn phase(&self) -> SurveyPhase {
        self.session().phase()
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session().session_id().clone()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.session().current_index()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.session().total_questions()
    }

    /// Question currently presented, cloned out for rendering.
    #[must_use]
    pub fn current_question(&self) -> Option<Question> {
        self.session().current_question().cloned()
    }

    /// Answer recorded for the current question, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<AnswerValue> {
        self.session().current_answer().cloned()
    }

    #[must_use]
    pub fn is_confirm_pending(&self) -> bool {
        self.session().is_confirm_pending()
    }

    #[must_use]
    pub fn progress(&self) -> SurveyProgress {
        self.session().progress()
    }

    #[must_use]
    pub fn settings(&self) -> SurveySettings {
        self.settings
    }
}

impl Drop for SurveyRunner {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.reset_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }
}
