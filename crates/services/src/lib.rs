#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use survey_core::Clock;

pub use error::SessionError;
pub use sessions::{SubmitOutcome, SurveyPhase, SurveyProgress, SurveyRunner, SurveySession};
