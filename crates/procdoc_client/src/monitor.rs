use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_warn};

use crate::{MonitorEvent, StatusApi};

enum MonitorCommand {
    StartPolling { session_id: String },
    StopPolling,
    KickOff { session_id: String },
}

/// Drives the recurring status poll for one session at a time.
///
/// Commands go in through a channel; poll results come back as
/// `MonitorEvent`s. A background thread owns the tokio runtime, so callers
/// stay synchronous. Invariants:
/// - `start` supersedes any previous loop (same or different session);
/// - at most one status request is in flight (the loop awaits each response
///   before the next tick; missed ticks are skipped, not queued);
/// - a response that resolves after its loop was superseded is dropped.
pub struct MonitorHandle {
    cmd_tx: mpsc::Sender<MonitorCommand>,
    event_rx: mpsc::Receiver<MonitorEvent>,
}

impl MonitorHandle {
    pub fn new(api: Arc<dyn StatusApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<MonitorCommand>();
        let (event_tx, event_rx) = mpsc::channel::<MonitorEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let generation = Arc::new(AtomicU64::new(0));
            let mut poller: Option<tokio::task::JoinHandle<()>> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    MonitorCommand::StartPolling { session_id } => {
                        let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;
                        if let Some(handle) = poller.take() {
                            handle.abort();
                        }
                        poller = Some(runtime.spawn(poll_loop(
                            api.clone(),
                            session_id,
                            my_generation,
                            generation.clone(),
                            event_tx.clone(),
                            poll_interval,
                        )));
                    }
                    MonitorCommand::StopPolling => {
                        // Bumping the generation invalidates any response
                        // already past its await when the abort lands.
                        generation.fetch_add(1, Ordering::SeqCst);
                        if let Some(handle) = poller.take() {
                            handle.abort();
                        }
                    }
                    MonitorCommand::KickOff { session_id } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let event = match api.start_processing(&session_id).await {
                                Ok(ack) => MonitorEvent::Status {
                                    session_id: session_id.clone(),
                                    report: ack.into(),
                                },
                                Err(err) => {
                                    client_warn!(
                                        "process kickoff failed for session {session_id}: {err}"
                                    );
                                    MonitorEvent::PollFailed {
                                        session_id: session_id.clone(),
                                        message: format!("process request failed: {err}"),
                                    }
                                }
                            };
                            let _ = event_tx.send(event);
                        });
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Begin polling `session_id`, cancelling any previous polling loop.
    pub fn start(&self, session_id: impl Into<String>) {
        let _ = self.cmd_tx.send(MonitorCommand::StartPolling {
            session_id: session_id.into(),
        });
    }

    /// Cancel the polling loop if one is active. Safe to call when idle.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(MonitorCommand::StopPolling);
    }

    /// Ask the server to start processing; the ack comes back through the
    /// normal event stream so the state machine sees one kind of update.
    pub fn kick_off(&self, session_id: impl Into<String>) {
        let _ = self.cmd_tx.send(MonitorCommand::KickOff {
            session_id: session_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<MonitorEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn poll_loop(
    api: Arc<dyn StatusApi>,
    session_id: String,
    my_generation: u64,
    generation: Arc<AtomicU64>,
    event_tx: mpsc::Sender<MonitorEvent>,
    poll_interval: Duration,
) {
    // The first tick completes immediately; the status endpoint is
    // idempotent, so an eager first probe is safe.
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut tick: u64 = 0;

    loop {
        interval.tick().await;
        tick += 1;

        let result = api.fetch_status(&session_id).await;

        // Checked after the await: a result that resolved for a superseded
        // loop must never be applied, even if the abort has not landed yet.
        if generation.load(Ordering::SeqCst) != my_generation {
            client_debug!("dropping stale poll result for session {session_id}");
            return;
        }

        let event = match result {
            Ok(report) => MonitorEvent::Status {
                session_id: session_id.clone(),
                report,
            },
            Err(err) => {
                client_warn!("poll tick {tick} failed for session {session_id}: {err}");
                MonitorEvent::PollFailed {
                    session_id: session_id.clone(),
                    message: err.to_string(),
                }
            }
        };

        if event_tx.send(event).is_err() {
            // Receiver gone; nothing left to poll for.
            return;
        }
    }
}
