use thiserror::Error;

use crate::model::{QuestionError, QuestionSetError, SurveySettingsError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
    #[error(transparent)]
    Settings(#[from] SurveySettingsError),
}
