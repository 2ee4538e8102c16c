#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Attach the tracker to a session and begin polling.
    StartRequested { session_id: crate::SessionId },
    /// Cancel polling; safe to send when the tracker is idle.
    StopRequested,
    /// One poll response from the status endpoint.
    StatusReceived {
        session_id: crate::SessionId,
        report: crate::StatusReport,
    },
    /// A poll attempt failed in transport or decoding.
    PollFailed {
        session_id: crate::SessionId,
        message: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
