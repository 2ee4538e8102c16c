use crate::steps::StepCatalog;
use crate::view_model::{StepRowView, TrackerViewModel};

pub type SessionId = String;

/// Coarse session status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Uploading,
    Processing,
    Completed,
    Error,
    /// A status value this client does not know about.
    Unknown,
}

/// One poll response as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: ServerStatus,
    pub error_message: Option<String>,
}

/// Session lifecycle as observed by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    #[default]
    Idle,
    Polling,
    Completed,
    Errored,
}

/// Explicit knobs for the heuristic progress advance. The server only
/// reports four coarse statuses; these control how the tracker fills in
/// sub-progress between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Percent shown once the server confirms it received the files.
    pub upload_progress: u8,
    /// Heuristic advance never passes this while the status is `processing`.
    pub processing_ceiling: u8,
    /// Upper bound for a single heuristic advance (lower bound is 1).
    pub max_increment: u8,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            upload_progress: 15,
            processing_ceiling: 90,
            max_increment: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    phase: TrackerPhase,
    session_id: Option<SessionId>,
    percent: u8,
    last_status: Option<ServerStatus>,
    error_message: Option<String>,
    transient_warning: Option<String>,
    config: TrackerConfig,
    catalog: StepCatalog,
    jitter: u64,
    dirty: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerState {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default(), StepCatalog::standard())
    }

    pub fn with_config(config: TrackerConfig, catalog: StepCatalog) -> Self {
        Self {
            phase: TrackerPhase::Idle,
            session_id: None,
            percent: 0,
            last_status: None,
            error_message: None,
            transient_warning: None,
            config,
            catalog,
            jitter: 0,
            dirty: false,
        }
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn view(&self) -> TrackerViewModel {
        let steps = self
            .catalog
            .steps()
            .iter()
            .zip(self.catalog.classify(self.percent))
            .map(|(step, mark)| StepRowView {
                id: step.id,
                label: step.id.label(),
                threshold: step.threshold,
                mark,
            })
            .collect();

        TrackerViewModel {
            phase: self.phase,
            session_id: self.session_id.clone(),
            percent: self.percent,
            status_line: self.status_line(),
            steps,
            transient_warning: self.transient_warning.clone(),
            error_message: self.error_message.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn status_line(&self) -> String {
        match (self.phase, self.last_status) {
            (TrackerPhase::Idle, _) => "idle".to_string(),
            (TrackerPhase::Polling, Some(ServerStatus::Uploading)) => {
                "files received".to_string()
            }
            (TrackerPhase::Polling, Some(ServerStatus::Processing)) => "processing".to_string(),
            (TrackerPhase::Polling, _) => "waiting for server".to_string(),
            (TrackerPhase::Completed, _) => "completed".to_string(),
            (TrackerPhase::Errored, _) => "processing failed".to_string(),
        }
    }

    /// Stale-response guard: only messages for the session currently being
    /// polled may mutate the tracker. A late response for a stopped or
    /// replaced session is discarded here.
    pub(crate) fn accepts(&self, session_id: &str) -> bool {
        self.phase == TrackerPhase::Polling && self.session_id.as_deref() == Some(session_id)
    }

    pub(crate) fn begin_session(&mut self, session_id: SessionId) {
        self.jitter = seed_from(&session_id);
        self.session_id = Some(session_id);
        self.phase = TrackerPhase::Polling;
        self.percent = 0;
        self.last_status = None;
        self.error_message = None;
        self.transient_warning = None;
        self.dirty = true;
    }

    /// Cancelled by the user: back to idle, keep the last rendered percent.
    pub(crate) fn halt(&mut self) {
        self.phase = TrackerPhase::Idle;
        self.dirty = true;
    }

    pub(crate) fn apply_uploading(&mut self) {
        let next = self.percent.max(self.config.upload_progress);
        let changed = next != self.percent
            || self.last_status != Some(ServerStatus::Uploading)
            || self.transient_warning.is_some();
        self.percent = next;
        self.last_status = Some(ServerStatus::Uploading);
        self.transient_warning = None;
        self.dirty |= changed;
    }

    /// Heuristic sub-progress while the server only says "processing":
    /// advance by a bounded per-session pseudo-random amount, capped at the
    /// ceiling. Never decreases, never reaches 100 from here.
    pub(crate) fn advance_processing(&mut self) {
        let mut next = self.percent;
        if next < self.config.processing_ceiling {
            let increment = self.next_increment();
            next = next
                .saturating_add(increment)
                .min(self.config.processing_ceiling);
        }
        let changed = next != self.percent
            || self.last_status != Some(ServerStatus::Processing)
            || self.transient_warning.is_some();
        self.percent = next;
        self.last_status = Some(ServerStatus::Processing);
        self.transient_warning = None;
        self.dirty |= changed;
    }

    pub(crate) fn complete(&mut self) {
        self.percent = 100;
        self.phase = TrackerPhase::Completed;
        self.last_status = Some(ServerStatus::Completed);
        self.transient_warning = None;
        self.dirty = true;
    }

    /// Returns the resolved error message so callers can forward it.
    pub(crate) fn fail(&mut self, message: Option<String>) -> String {
        let message = message.unwrap_or_else(|| "processing failed".to_string());
        self.phase = TrackerPhase::Errored;
        self.last_status = Some(ServerStatus::Error);
        self.error_message = Some(message.clone());
        self.transient_warning = None;
        self.dirty = true;
        message
    }

    pub(crate) fn note_poll_failure(&mut self, message: String) {
        self.transient_warning = Some(message);
        self.dirty = true;
    }

    /// One bounded advance in `1..=max_increment`, drawn from an xorshift64*
    /// stream seeded per session. Deterministic given the session id, which
    /// keeps `update` pure and the advance reproducible in tests.
    fn next_increment(&mut self) -> u8 {
        let mut x = self.jitter;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.jitter = x;
        let value = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        let span = u64::from(self.config.max_increment.max(1));
        (value % span) as u8 + 1
    }
}

// FNV-1a over the opaque session id. The low bit is forced on because the
// xorshift state must be nonzero.
fn seed_from(session_id: &str) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for byte in session_id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash | 1
}
