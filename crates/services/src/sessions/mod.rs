mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SurveyProgress;
pub use service::{SurveyPhase, SurveySession};
pub use workflow::{SubmitOutcome, SurveyRunner};
