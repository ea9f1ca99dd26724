/// Aggregated view of survey progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyProgress {
    pub total: usize,
    pub answered: usize,
    pub current: usize,
    pub is_complete: bool,
}
