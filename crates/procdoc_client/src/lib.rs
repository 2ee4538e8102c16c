//! Procdoc client: typed HTTP API and the session-status polling monitor.
mod api;
mod filename;
mod monitor;
mod persist;
mod preview;
mod types;
mod validate;

pub use api::{ApiClient, ApiSettings, StatusApi};
pub use filename::export_filename;
pub use monitor::MonitorHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{documentation_preview, MAX_PREVIEW_CONTENT};
pub use types::{
    ApiError, DocumentInfo, ExportedMarkdown, FilesReceived, HealthReport, HistoryPage,
    MonitorEvent, Pagination, ProcessAck, ProcessingLogEntry, SessionDetails, SessionFile,
    SessionResult, SessionStatus, SessionSummary, StatusReport, UploadReceipt,
};
pub use validate::{
    validate_upload, AiConfig, UploadIssue, UploadRequest, IMAGE_EXTENSIONS, MAX_UPLOAD_BYTES,
    TRANSCRIPTION_EXTENSIONS,
};
