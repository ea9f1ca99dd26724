//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

use crate::sessions::SurveyPhase;

/// Errors emitted by survey session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The operation is not permitted in the session's current phase. The
    /// session state is left unchanged.
    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: SurveyPhase,
    },

    #[error("submission may only be requested from the final question (current {current}, final {last})")]
    NotAtFinalQuestion { current: usize, last: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
