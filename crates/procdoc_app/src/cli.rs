use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use procdoc_client::{AiConfig, UploadRequest};

#[derive(Debug, Parser)]
#[command(
    name = "procdoc",
    about = "Client for the RPA process-documentation service",
    version
)]
pub struct Cli {
    /// Base URL of the documentation service.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Status poll interval in milliseconds.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a transcription and screenshots, printing the new session id.
    Upload(UploadArgs),
    /// Start processing an uploaded session and watch it to completion.
    Process { session_id: String },
    /// Watch a session that is already processing.
    Watch { session_id: String },
    /// Upload, process, and watch in one go, then show the result.
    Run(UploadArgs),
    /// One-shot status probe.
    Status { session_id: String },
    /// Fetch the generated documentation and print a preview.
    Result { session_id: String },
    /// List past sessions.
    History {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
    /// Show files, logs, and documents for one session.
    Show { session_id: String },
    /// Save an export to disk.
    Export {
        session_id: String,
        #[arg(long, value_enum, default_value = "markdown")]
        format: ExportFormat,
        #[arg(long, default_value = "output")]
        out: PathBuf,
    },
    /// Download a session artifact (transcription, documentation, screenshot_N).
    Download {
        session_id: String,
        file_type: String,
        #[arg(long, default_value = "output")]
        out: PathBuf,
    },
    /// Check service health.
    Health,
    /// Persist defaults for future runs.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Voice transcription file (.txt or .vtt).
    #[arg(long)]
    pub transcription: Option<PathBuf>,

    /// Screenshot file (.png, .jpg, .jpeg); repeatable.
    #[arg(long = "screenshot")]
    pub screenshots: Vec<PathBuf>,

    /// Document from the transcription alone, skipping screenshots.
    #[arg(long)]
    pub transcription_only: bool,

    /// AI provider override for this run.
    #[arg(long)]
    pub provider: Option<String>,

    /// AI model override for this run.
    #[arg(long)]
    pub model: Option<String>,

    /// Agent profile override for this run.
    #[arg(long)]
    pub agent_type: Option<String>,

    /// API key forwarded to the provider.
    #[arg(long)]
    pub api_key: Option<String>,
}

impl UploadArgs {
    pub fn into_request(self, defaults: AiConfig) -> UploadRequest {
        UploadRequest {
            transcription: self.transcription,
            screenshots: self.screenshots,
            transcription_only: self.transcription_only,
            ai: AiConfig {
                provider: self.provider.unwrap_or(defaults.provider),
                model: self.model.unwrap_or(defaults.model),
                agent_type: self.agent_type.unwrap_or(defaults.agent_type),
                api_key: self.api_key.or(defaults.api_key),
            },
        }
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long)]
    pub provider: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub agent_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Markdown,
    Docx,
}
