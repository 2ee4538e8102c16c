use crate::{Effect, Msg, ServerStatus, TrackerPhase, TrackerState};

/// Pure update function: applies a message to the tracker and returns any
/// effects. Terminal transitions always pair their notification with
/// `Effect::StopPolling`, and the terminal phase makes every later message a
/// no-op, so the notification fires exactly once per session.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested { session_id } => {
            // Restart is allowed from any phase, including terminal ones
            // (user retries). The runner cancels the previous loop before
            // installing the new one.
            state.begin_session(session_id.clone());
            vec![Effect::StartPolling { session_id }]
        }
        Msg::StopRequested => {
            if state.phase() == TrackerPhase::Polling {
                state.halt();
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::StatusReceived { session_id, report } => {
            if !state.accepts(&session_id) {
                return (state, Vec::new());
            }
            match report.status {
                ServerStatus::Uploading => {
                    state.apply_uploading();
                    Vec::new()
                }
                ServerStatus::Processing => {
                    state.advance_processing();
                    Vec::new()
                }
                ServerStatus::Completed => {
                    state.complete();
                    vec![Effect::StopPolling, Effect::NotifyCompleted { session_id }]
                }
                ServerStatus::Error => {
                    let message = state.fail(report.error_message);
                    vec![
                        Effect::StopPolling,
                        Effect::NotifyError { session_id, message },
                    ]
                }
                // Unknown statuses are ignored, not fatal: new server states
                // must not crash old clients.
                ServerStatus::Unknown => Vec::new(),
            }
        }
        Msg::PollFailed { session_id, message } => {
            if !state.accepts(&session_id) {
                return (state, Vec::new());
            }
            // A single failed poll must not abort monitoring; the next
            // scheduled tick retries.
            state.note_poll_failure(message.clone());
            vec![Effect::WarnPollFailure { message }]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
