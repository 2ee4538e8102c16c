use procdoc_core::{StepMark, TrackerViewModel};

const BAR_WIDTH: usize = 30;

/// Pure rendering: one view model in, terminal lines out. No retained
/// state, so rendering the same view twice yields identical lines.
pub fn render(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "[{}] {:>3}%  {}",
        bar(view.percent),
        view.percent,
        view.status_line
    ));
    for step in &view.steps {
        let mark = match step.mark {
            StepMark::Completed => 'x',
            StepMark::Current => '>',
            StepMark::Pending => ' ',
        };
        lines.push(format!("  [{mark}] {}", step.label));
    }
    if let Some(warning) = &view.transient_warning {
        lines.push(format!("  ! {warning} (retrying)"));
    }
    if let Some(error) = &view.error_message {
        lines.push(format!("  error: {error}"));
    }
    lines
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    let mut bar = String::with_capacity(BAR_WIDTH);
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar
}

#[cfg(test)]
mod tests {
    use procdoc_core::{update, Msg, ServerStatus, StatusReport, TrackerState};

    use super::render;

    fn polling_view() -> procdoc_core::TrackerViewModel {
        let (state, _) = update(
            TrackerState::new(),
            Msg::StartRequested {
                session_id: "s-1".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::StatusReceived {
                session_id: "s-1".to_string(),
                report: StatusReport {
                    status: ServerStatus::Uploading,
                    error_message: None,
                },
            },
        );
        state.view()
    }

    #[test]
    fn rendering_is_idempotent() {
        let view = polling_view();
        assert_eq!(render(&view), render(&view));
    }

    #[test]
    fn header_shows_percent_and_status() {
        let view = polling_view();
        let lines = render(&view);
        assert!(lines[0].contains("15%"));
        assert!(lines[0].contains("files received"));
    }

    #[test]
    fn steps_render_one_line_each() {
        let view = polling_view();
        let lines = render(&view);
        // Header plus the six pipeline steps.
        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("  [x]")); // threshold 10 completed at 15
        assert!(lines[2].starts_with("  [>]")); // threshold 30 in the window
    }
}
