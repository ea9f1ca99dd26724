mod answer;
mod ids;
mod question;
mod response;
mod settings;

pub use answer::{AnswerMap, AnswerValue};
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{Question, QuestionError, QuestionKind, QuestionSet, QuestionSetError};
pub use response::{ResponseRecord, ResponseStatus};
pub use settings::{SurveySettings, SurveySettingsError};
