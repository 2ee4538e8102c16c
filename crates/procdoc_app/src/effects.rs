use client_logging::{client_error, client_info, client_warn};
use procdoc_client::MonitorHandle;
use procdoc_core::Effect;

/// Executes the effects the pure core asks for against the polling monitor.
pub struct EffectRunner<'a> {
    monitor: &'a MonitorHandle,
}

impl<'a> EffectRunner<'a> {
    pub fn new(monitor: &'a MonitorHandle) -> Self {
        Self { monitor }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { session_id } => {
                    client_info!("polling session {session_id}");
                    self.monitor.start(session_id);
                }
                Effect::StopPolling => {
                    self.monitor.stop();
                }
                Effect::NotifyCompleted { session_id } => {
                    client_info!("session {session_id} completed");
                }
                Effect::NotifyError { session_id, message } => {
                    client_error!("session {session_id} failed: {message}");
                }
                Effect::WarnPollFailure { message } => {
                    client_warn!("status poll failed, retrying next tick: {message}");
                }
            }
        }
    }
}
