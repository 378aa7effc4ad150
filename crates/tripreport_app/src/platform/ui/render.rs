use tripreport_core::AppViewModel;

pub(crate) const COMMANDS_HELP: &str =
    "Commands: select <path> | sheet <name> | generate | download <filename> | help | quit";

const BAR_WIDTH: usize = 20;

/// Print the current session view as a block of lines.
pub(crate) fn render(view: &AppViewModel) {
    for line in render_lines(view) {
        println!("{line}");
    }
}

fn render_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![String::new(), format!("File: {}", view.file_label)];

    if let Some(picker) = &view.worksheet_picker {
        let selected = picker.selected.as_deref().unwrap_or("(none)");
        lines.push(format!(
            "Worksheet: {} (options: {})",
            selected,
            picker.options.join(", ")
        ));
    }

    let disabled = if view.generate_enabled {
        ""
    } else {
        " (disabled)"
    };
    lines.push(format!("[generate] {}{}", view.generate_label, disabled));

    if let Some(error) = &view.error_banner {
        lines.push(format!("Error: {error}"));
    }
    if let Some(success) = &view.success_banner {
        lines.push(format!("Success: {success}"));
    }

    if let Some(progress) = &view.progress {
        lines.push(format!("{} {}", progress_bar(progress.percent), progress.text));
    }

    if !view.report_cards.is_empty() {
        lines.push(format!("Generated Reports ({})", view.report_cards.len()));
        for card in &view.report_cards {
            lines.push(format!(
                "  Trip {}: {} pings, {} KM, {} KM/Hr -> {}",
                card.trip_id, card.ping_count, card.distance_km, card.avg_speed_kmh, card.filename
            ));
        }
    }

    lines
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
