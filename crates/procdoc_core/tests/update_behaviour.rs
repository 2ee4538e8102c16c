use std::sync::Once;

use procdoc_core::{
    update, Effect, Msg, ServerStatus, StatusReport, TrackerPhase, TrackerState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn start(state: TrackerState, session_id: &str) -> (TrackerState, Vec<Effect>) {
    update(
        state,
        Msg::StartRequested {
            session_id: session_id.to_string(),
        },
    )
}

fn receive(state: TrackerState, session_id: &str, status: ServerStatus) -> (TrackerState, Vec<Effect>) {
    update(
        state,
        Msg::StatusReceived {
            session_id: session_id.to_string(),
            report: StatusReport {
                status,
                error_message: None,
            },
        },
    )
}

#[test]
fn start_installs_polling_for_the_session() {
    init_logging();
    let (state, effects) = start(TrackerState::new(), "s-1");

    assert_eq!(state.phase(), TrackerPhase::Polling);
    assert_eq!(state.session_id(), Some("s-1"));
    assert_eq!(state.percent(), 0);
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session_id: "s-1".to_string()
        }]
    );
}

#[test]
fn uploading_sets_the_configured_floor() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, effects) = receive(state, "s-1", ServerStatus::Uploading);

    assert_eq!(state.percent(), 15);
    assert_eq!(state.view().status_line, "files received");
    assert!(effects.is_empty());
}

#[test]
fn processing_is_monotonic_and_stays_below_one_hundred() {
    init_logging();
    let (mut state, _) = start(TrackerState::new(), "s-1");
    let mut previous = state.percent();

    // Every advance is at least 1, so 120 ticks are enough to pin the
    // percentage at the ceiling whatever the per-session stream draws.
    for _ in 0..120 {
        let (next, effects) = receive(state, "s-1", ServerStatus::Processing);
        assert!(effects.is_empty());
        assert!(next.percent() >= previous);
        assert!(next.percent() < 100);
        assert!(next.percent() <= 90);
        previous = next.percent();
        state = next;
    }

    assert_eq!(state.percent(), 90);
    assert_eq!(state.phase(), TrackerPhase::Polling);
}

#[test]
fn uploading_after_processing_never_moves_progress_backwards() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    let before = state.percent();

    let (state, _) = receive(state, "s-1", ServerStatus::Uploading);
    assert!(state.percent() >= before);
}

#[test]
fn completed_forces_one_hundred_and_notifies_exactly_once() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    let (state, effects) = receive(state, "s-1", ServerStatus::Completed);

    assert_eq!(state.phase(), TrackerPhase::Completed);
    assert_eq!(state.percent(), 100);
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling,
            Effect::NotifyCompleted {
                session_id: "s-1".to_string()
            },
        ]
    );

    // Late ticks after the terminal transition change nothing and emit
    // nothing, however many arrive.
    let (state, effects) = receive(state, "s-1", ServerStatus::Completed);
    assert!(effects.is_empty());
    let (state, effects) = receive(state, "s-1", ServerStatus::Processing);
    assert!(effects.is_empty());
    assert_eq!(state.percent(), 100);
    assert_eq!(state.phase(), TrackerPhase::Completed);
}

#[test]
fn error_stops_polling_and_notifies_exactly_once() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            session_id: "s-1".to_string(),
            report: StatusReport {
                status: ServerStatus::Error,
                error_message: Some("OCR backend unavailable".to_string()),
            },
        },
    );

    assert_eq!(state.phase(), TrackerPhase::Errored);
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling,
            Effect::NotifyError {
                session_id: "s-1".to_string(),
                message: "OCR backend unavailable".to_string(),
            },
        ]
    );
    assert_eq!(
        state.view().error_message.as_deref(),
        Some("OCR backend unavailable")
    );

    let (_, effects) = receive(state, "s-1", ServerStatus::Error);
    assert!(effects.is_empty());
}

#[test]
fn unknown_status_is_ignored() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Uploading);
    let before = state.clone();

    let (state, effects) = receive(state, "s-1", ServerStatus::Unknown);
    assert!(effects.is_empty());
    assert_eq!(state.percent(), before.percent());
    assert_eq!(state.phase(), TrackerPhase::Polling);
}

#[test]
fn responses_for_another_session_are_discarded() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Uploading);
    let before = state.clone();

    // A late response from a previously tracked session must not leak in.
    let (state, effects) = receive(state, "old-session", ServerStatus::Completed);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn starting_a_new_session_replaces_the_old_one() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-a");
    let (state, _) = receive(state, "s-a", ServerStatus::Processing);

    let (state, effects) = start(state, "s-b");
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session_id: "s-b".to_string()
        }]
    );
    assert_eq!(state.session_id(), Some("s-b"));
    assert_eq!(state.percent(), 0);

    // Only session B is polled thereafter.
    let (state, effects) = receive(state, "s-a", ServerStatus::Completed);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), TrackerPhase::Polling);
}

#[test]
fn stop_when_idle_is_a_noop() {
    init_logging();
    let state = TrackerState::new();
    let (next, effects) = update(state.clone(), Msg::StopRequested);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn stop_while_polling_halts_and_keeps_progress() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    let before = state.percent();

    let (state, effects) = update(state, Msg::StopRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(state.phase(), TrackerPhase::Idle);
    assert_eq!(state.percent(), before);

    // Once halted, even the tracked session's responses are stale.
    let (state, effects) = receive(state, "s-1", ServerStatus::Completed);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), TrackerPhase::Idle);
}

#[test]
fn poll_failure_warns_but_keeps_polling() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, effects) = update(
        state,
        Msg::PollFailed {
            session_id: "s-1".to_string(),
            message: "connection refused".to_string(),
        },
    );

    assert_eq!(state.phase(), TrackerPhase::Polling);
    assert_eq!(
        effects,
        vec![Effect::WarnPollFailure {
            message: "connection refused".to_string()
        }]
    );
    assert_eq!(
        state.view().transient_warning.as_deref(),
        Some("connection refused")
    );

    // The next successful poll clears the warning and applies normally.
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);
    assert!(state.view().transient_warning.is_none());
    assert!(state.percent() > 0);
}

#[test]
fn restart_after_terminal_state_polls_again() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Completed);
    assert_eq!(state.phase(), TrackerPhase::Completed);

    let (state, effects) = start(state, "s-2");
    assert_eq!(state.phase(), TrackerPhase::Polling);
    assert_eq!(state.percent(), 0);
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            session_id: "s-2".to_string()
        }]
    );
}

#[test]
fn view_rendering_is_idempotent() {
    init_logging();
    let (state, _) = start(TrackerState::new(), "s-1");
    let (state, _) = receive(state, "s-1", ServerStatus::Processing);

    assert_eq!(state.view(), state.view());
}
