use crate::{SessionId, StepId, StepMark, TrackerPhase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerViewModel {
    pub phase: TrackerPhase,
    pub session_id: Option<SessionId>,
    pub percent: u8,
    pub status_line: String,
    pub steps: Vec<StepRowView>,
    pub transient_warning: Option<String>,
    pub error_message: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRowView {
    pub id: StepId,
    pub label: &'static str,
    pub threshold: u8,
    pub mark: StepMark,
}
