use std::thread;
use std::time::Duration;

use client_logging::set_poll_tick;
use procdoc_client::{MonitorEvent, MonitorHandle, SessionStatus, StatusReport};
use procdoc_core::{update, Msg, ServerStatus, TrackerPhase, TrackerState};

use crate::effects::EffectRunner;
use crate::render;

pub struct WatchOutcome {
    pub phase: TrackerPhase,
    /// The last wire report seen, for post-run display (timings etc.).
    pub last_report: Option<StatusReport>,
}

/// Drive the tracker until it reaches a terminal phase, rendering progress
/// whenever the state changes. `kick_off` additionally asks the server to
/// start processing; its ack arrives through the same event stream.
pub fn watch(monitor: &MonitorHandle, session_id: &str, kick_off: bool) -> WatchOutcome {
    let runner = EffectRunner::new(monitor);
    let mut state = TrackerState::new();
    let mut last_report: Option<StatusReport> = None;
    let mut tick: u64 = 0;

    let (next, effects) = update(
        state,
        Msg::StartRequested {
            session_id: session_id.to_string(),
        },
    );
    state = next;
    runner.run(effects);
    if kick_off {
        monitor.kick_off(session_id);
    }
    render_if_dirty(&mut state);

    loop {
        if let Some(event) = monitor.try_recv() {
            tick += 1;
            set_poll_tick(tick);

            let msg = map_event(event, &mut last_report);
            let (next, effects) = update(state, msg);
            state = next;
            runner.run(effects);
            render_if_dirty(&mut state);

            match state.phase() {
                TrackerPhase::Completed | TrackerPhase::Errored => {
                    return WatchOutcome {
                        phase: state.phase(),
                        last_report,
                    };
                }
                TrackerPhase::Idle | TrackerPhase::Polling => {}
            }
        } else {
            thread::sleep(Duration::from_millis(20));
        }
    }
}

fn render_if_dirty(state: &mut TrackerState) {
    let view = state.view();
    if state.consume_dirty() {
        for line in render::render(&view) {
            println!("{line}");
        }
        println!();
    }
}

fn map_event(event: MonitorEvent, last_report: &mut Option<StatusReport>) -> Msg {
    match event {
        MonitorEvent::Status { session_id, report } => {
            let status = map_status(report.status);
            let error_message = report.error_message.clone();
            *last_report = Some(report);
            Msg::StatusReceived {
                session_id,
                report: procdoc_core::StatusReport {
                    status,
                    error_message,
                },
            }
        }
        MonitorEvent::PollFailed { session_id, message } => {
            Msg::PollFailed { session_id, message }
        }
    }
}

fn map_status(status: SessionStatus) -> ServerStatus {
    match status {
        SessionStatus::Uploading => ServerStatus::Uploading,
        SessionStatus::Processing => ServerStatus::Processing,
        SessionStatus::Completed => ServerStatus::Completed,
        SessionStatus::Error => ServerStatus::Error,
        SessionStatus::Unknown => ServerStatus::Unknown,
    }
}
