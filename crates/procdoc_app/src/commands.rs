use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use procdoc_client::{
    documentation_preview, export_filename, validate_upload, ApiClient, AtomicFileWriter,
    MonitorHandle, StatusApi, UploadReceipt, UploadRequest,
};
use procdoc_core::TrackerPhase;
use tokio::runtime::Runtime;

use crate::cli::{ConfigArgs, ExportFormat};
use crate::format;
use crate::prefs::{self, Prefs};
use crate::watch;

pub fn upload(
    runtime: &Runtime,
    client: &ApiClient,
    request: &UploadRequest,
) -> anyhow::Result<UploadReceipt> {
    let issues = validate_upload(request);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  {issue}");
        }
        anyhow::bail!("upload rejected by client-side validation");
    }

    let receipt = runtime.block_on(client.upload(request))?;
    println!(
        "session {} created ({} screenshot(s){})",
        receipt.session_id,
        receipt.files_received.screenshots,
        if receipt.files_received.transcription {
            ", transcription attached"
        } else {
            ""
        }
    );
    Ok(receipt)
}

pub fn watch_session(
    client: &ApiClient,
    session_id: &str,
    kick_off: bool,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    let monitor = MonitorHandle::new(Arc::new(client.clone()), poll_interval);
    let outcome = watch::watch(&monitor, session_id, kick_off);

    match outcome.phase {
        TrackerPhase::Completed => {
            if let Some(secs) = outcome
                .last_report
                .as_ref()
                .and_then(|report| report.processing_time)
            {
                println!("done in {}", format::format_duration(secs));
            }
            Ok(())
        }
        TrackerPhase::Errored => anyhow::bail!("session {session_id} ended in error"),
        phase => anyhow::bail!("watch ended in unexpected phase {phase:?}"),
    }
}

pub fn status(runtime: &Runtime, client: &ApiClient, session_id: &str) -> anyhow::Result<()> {
    let report = runtime.block_on(client.fetch_status(session_id))?;
    println!("session {}: {}", report.session_id, report.status);
    if let Some(message) = &report.error_message {
        println!("  error: {message}");
    }
    if let Some(secs) = report.processing_time {
        println!("  processing time: {}", format::format_duration(secs));
    }
    Ok(())
}

pub fn result(runtime: &Runtime, client: &ApiClient, session_id: &str) -> anyhow::Result<()> {
    let result = runtime.block_on(client.fetch_result(session_id))?;
    match result.documentation {
        Some(documentation) => println!("{}", documentation_preview(&documentation)),
        None => println!("session {session_id} has no documentation yet"),
    }
    if let Some(secs) = result.processing_time {
        println!();
        println!("generated in {}", format::format_duration(secs));
    }
    Ok(())
}

pub fn history(
    runtime: &Runtime,
    client: &ApiClient,
    page: u32,
    per_page: u32,
) -> anyhow::Result<()> {
    let history = runtime.block_on(client.fetch_history(page, per_page))?;
    if history.sessions.is_empty() {
        println!("no sessions on page {page}");
        return Ok(());
    }
    for summary in &history.sessions {
        println!("{}", format::history_row(summary));
    }
    let pagination = history.pagination;
    println!(
        "page {}/{} ({} sessions total)",
        pagination.page, pagination.pages, pagination.total
    );
    Ok(())
}

pub fn show(runtime: &Runtime, client: &ApiClient, session_id: &str) -> anyhow::Result<()> {
    let details = runtime.block_on(client.fetch_session_details(session_id))?;
    println!("{}", format::history_row(&details.summary));
    if let Some(message) = &details.summary.error_message {
        println!("error: {message}");
    }
    if !details.files.is_empty() {
        println!("files:");
        for file in &details.files {
            println!(
                "  {} {}{}",
                file.kind,
                file.filename,
                if file.exists { "" } else { " (missing)" }
            );
        }
    }
    if !details.documents.is_empty() {
        println!("documents:");
        for document in &details.documents {
            println!("  {} ({} bytes)", document.format, document.size);
        }
    }
    if !details.logs.is_empty() {
        println!("processing log:");
        for entry in &details.logs {
            println!("  [{:<7}] {}: {}", entry.level, entry.step, entry.message);
        }
    }
    Ok(())
}

pub fn export(
    runtime: &Runtime,
    client: &ApiClient,
    session_id: &str,
    export_format: ExportFormat,
    out: &Path,
) -> anyhow::Result<()> {
    let writer = AtomicFileWriter::new(out.to_path_buf());
    let path = match export_format {
        ExportFormat::Markdown => {
            let export = runtime.block_on(client.export_markdown(session_id))?;
            writer.write(
                &export_filename("documentation", session_id, "md"),
                &export.content,
            )?
        }
        ExportFormat::Docx => {
            let bytes = runtime.block_on(client.download_docx(session_id))?;
            writer.write_bytes(
                &export_filename("documentation", session_id, "docx"),
                &bytes,
            )?
        }
    };
    println!("saved {}", path.display());
    Ok(())
}

pub fn download(
    runtime: &Runtime,
    client: &ApiClient,
    session_id: &str,
    file_type: &str,
    out: &Path,
) -> anyhow::Result<()> {
    let bytes = runtime.block_on(client.download_file(session_id, file_type))?;
    let writer = AtomicFileWriter::new(out.to_path_buf());
    let path = writer.write_bytes(
        &export_filename(file_type, session_id, artifact_extension(file_type)),
        &bytes,
    )?;
    println!("saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub fn health(runtime: &Runtime, client: &ApiClient) -> anyhow::Result<()> {
    let report = runtime.block_on(client.health())?;
    let version = report
        .version
        .map(|version| format!(" (version {version})"))
        .unwrap_or_default();
    println!("service is {}{version}", report.status);
    Ok(())
}

pub fn config(dir: &Path, current: Prefs, args: &ConfigArgs) -> anyhow::Result<()> {
    let next = Prefs {
        base_url: args.base_url.clone().or(current.base_url),
        provider: args.provider.clone().or(current.provider),
        model: args.model.clone().or(current.model),
        agent_type: args.agent_type.clone().or(current.agent_type),
    };
    prefs::save(dir, &next);
    println!("defaults updated");
    Ok(())
}

fn artifact_extension(file_type: &str) -> &'static str {
    if file_type.starts_with("screenshot") {
        return "png";
    }
    match file_type {
        "transcription" => "txt",
        "documentation" => "md",
        _ => "bin",
    }
}
