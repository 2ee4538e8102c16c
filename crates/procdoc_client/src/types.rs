use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Coarse session status on the wire. Values this client does not know
/// decode to `Unknown` instead of failing: new server states must not crash
/// old clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Uploading,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SessionStatus::Uploading => "uploading",
            SessionStatus::Processing => "processing",
            SessionStatus::Completed => "completed",
            SessionStatus::Error => "error",
            SessionStatus::Unknown => "unknown",
        };
        f.write_str(text)
    }
}

/// `GET /status/{id}` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusReport {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// `POST /upload` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub session_id: String,
    /// The server reports `"uploaded"` here, which is not a session status.
    pub status: String,
    #[serde(default)]
    pub transcription_only_mode: bool,
    pub files_received: FilesReceived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FilesReceived {
    pub transcription: bool,
    pub screenshots: usize,
}

/// `POST /process/{id}` response body. The server processes synchronously,
/// so a successful ack usually carries a terminal status already.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessAck {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

impl From<ProcessAck> for StatusReport {
    fn from(ack: ProcessAck) -> Self {
        StatusReport {
            session_id: ack.session_id,
            status: ack.status,
            created_at: None,
            updated_at: None,
            error_message: ack.error,
            processing_time: ack.processing_time,
        }
    }
}

/// `GET /result/{id}` response body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionResult {
    pub session_id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// One row of `GET /history`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub transcription_only_mode: bool,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub files_count: u32,
    #[serde(default)]
    pub actions_count: u32,
    #[serde(default)]
    pub screenshot_count: u32,
    #[serde(default)]
    pub has_transcription: bool,
    #[serde(default)]
    pub has_screenshots: bool,
    #[serde(default)]
    pub has_documentation: bool,
    /// Server-formatted duration; absent on older servers.
    #[serde(default)]
    pub processing_duration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPage {
    pub sessions: Vec<SessionSummary>,
    pub pagination: Pagination,
}

/// `GET /history/{id}` response body: the summary plus attachments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionDetails {
    #[serde(flatten)]
    pub summary: SessionSummary,
    #[serde(default)]
    pub files: Vec<SessionFile>,
    #[serde(default)]
    pub logs: Vec<ProcessingLogEntry>,
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionFile {
    #[serde(rename = "type")]
    pub kind: String,
    pub filename: String,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessingLogEntry {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub level: String,
    pub step: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentInfo {
    pub id: i64,
    pub format: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub size: u64,
}

/// `GET /export/{id}/markdown` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportedMarkdown {
    pub content: String,
    pub format: String,
}

/// `GET /health` response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// What the polling monitor reports back to the driving loop.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// One successful poll (or kickoff ack) for the session.
    Status {
        session_id: String,
        report: StatusReport,
    },
    /// One failed poll attempt. The loop keeps running; the next scheduled
    /// tick retries.
    PollFailed {
        session_id: String,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("attachment too large (max {max_bytes} bytes, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
