use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurveySettingsError {
    #[error("completion reset seconds must be between 1 and 600")]
    InvalidCompletionResetSecs,
}

/// Configuration settings for a survey session.
///
/// Controls how long a completed session lingers on the thank-you state
/// before it resets for the next respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveySettings {
    completion_reset_secs: u32,
}

impl SurveySettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns `SurveySettingsError::InvalidCompletionResetSecs` if the delay
    /// is outside 1..=600 seconds.
    pub fn new(completion_reset_secs: u32) -> Result<Self, SurveySettingsError> {
        if !(1..=600).contains(&completion_reset_secs) {
            return Err(SurveySettingsError::InvalidCompletionResetSecs);
        }
        Ok(Self {
            completion_reset_secs,
        })
    }

    #[must_use]
    pub fn completion_reset_secs(&self) -> u32 {
        self.completion_reset_secs
    }

    /// Delay between completion and the automatic reset for the next respondent.
    #[must_use]
    pub fn completion_reset_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.completion_reset_secs))
    }
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            completion_reset_secs: 5,
        }
    }
}
