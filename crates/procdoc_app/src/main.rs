mod cli;
mod commands;
mod effects;
mod format;
mod logging;
mod prefs;
mod render;
mod watch;

use std::path::Path;
use std::time::Duration;

use clap::Parser;
use procdoc_client::{AiConfig, ApiClient, ApiSettings};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

fn main() -> anyhow::Result<()> {
    logging::initialize(logging::LogDestination::File);

    let args = cli::Cli::parse();
    let prefs = prefs::load(Path::new("."));

    if let cli::Command::Config(config) = &args.command {
        return commands::config(Path::new("."), prefs, config);
    }

    let base_url = args
        .base_url
        .clone()
        .or_else(|| prefs.base_url.clone())
        .unwrap_or_else(|| ApiSettings::default().base_url);
    let client = ApiClient::new(ApiSettings {
        base_url,
        ..ApiSettings::default()
    })?;
    let runtime = tokio::runtime::Runtime::new()?;
    let poll_interval = args
        .poll_interval_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_POLL_INTERVAL);
    let ai_defaults = AiConfig {
        provider: prefs.provider.clone().unwrap_or_else(|| AiConfig::default().provider),
        model: prefs.model.clone().unwrap_or_else(|| AiConfig::default().model),
        agent_type: prefs
            .agent_type
            .clone()
            .unwrap_or_else(|| AiConfig::default().agent_type),
        api_key: None,
    };

    match args.command {
        cli::Command::Upload(upload) => {
            commands::upload(&runtime, &client, &upload.into_request(ai_defaults))?;
            Ok(())
        }
        cli::Command::Process { session_id } => {
            commands::watch_session(&client, &session_id, true, poll_interval)
        }
        cli::Command::Watch { session_id } => {
            commands::watch_session(&client, &session_id, false, poll_interval)
        }
        cli::Command::Run(upload) => {
            let receipt = commands::upload(&runtime, &client, &upload.into_request(ai_defaults))?;
            commands::watch_session(&client, &receipt.session_id, true, poll_interval)?;
            commands::result(&runtime, &client, &receipt.session_id)
        }
        cli::Command::Status { session_id } => commands::status(&runtime, &client, &session_id),
        cli::Command::Result { session_id } => commands::result(&runtime, &client, &session_id),
        cli::Command::History { page, per_page } => {
            commands::history(&runtime, &client, page, per_page)
        }
        cli::Command::Show { session_id } => commands::show(&runtime, &client, &session_id),
        cli::Command::Export {
            session_id,
            format,
            out,
        } => commands::export(&runtime, &client, &session_id, format, &out),
        cli::Command::Download {
            session_id,
            file_type,
            out,
        } => commands::download(&runtime, &client, &session_id, &file_type, &out),
        cli::Command::Health => commands::health(&runtime, &client),
        cli::Command::Config(_) => unreachable!("handled before client construction"),
    }
}
