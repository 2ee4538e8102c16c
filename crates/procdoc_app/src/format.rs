use procdoc_client::SessionSummary;

/// Duration display matching the service's own history formatting.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1}s")
    } else {
        let minutes = (seconds / 60.0) as u64;
        let rest = (seconds % 60.0) as u64;
        format!("{minutes}m {rest}s")
    }
}

pub fn history_row(summary: &SessionSummary) -> String {
    let duration = summary
        .processing_duration
        .clone()
        .or_else(|| summary.processing_time.map(format_duration))
        .unwrap_or_else(|| "N/A".to_string());
    let created = summary
        .created_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{}  {:<10}  {:>3} files  {:>3} actions  {:>8}  {}",
        summary.id, summary.status, summary.files_count, summary.actions_count, duration, created
    )
}

// The server emits ISO-8601 without a zone; show it minute-precise.
fn format_timestamp(raw: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn short_durations_show_seconds() {
        assert_eq!(format_duration(42.5), "42.5s");
    }

    #[test]
    fn long_durations_show_minutes_and_seconds() {
        assert_eq!(format_duration(125.0), "2m 5s");
    }
}
