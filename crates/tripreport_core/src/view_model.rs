use std::fmt::Write as _;

use crate::{BatchSession, BatchStatus, ReportSummary};

/// File picker label when nothing has been chosen yet.
pub const FILE_PROMPT: &str = "Choose CSV or Excel File";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub file_label: String,
    /// Present only when a worksheet list exists (Excel sources).
    pub worksheet_picker: Option<WorksheetPickerView>,
    pub generate_enabled: bool,
    pub generate_label: String,
    pub error_banner: Option<String>,
    pub success_banner: Option<String>,
    /// Present only while loading with an active batch.
    pub progress: Option<ProgressView>,
    pub report_cards: Vec<ReportCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetPickerView {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub percent: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCardView {
    pub trip_id: i64,
    pub ping_count: u64,
    /// Kilometers, two decimal places.
    pub distance_km: String,
    /// Kilometers per hour, two decimal places.
    pub avg_speed_kmh: String,
    pub filename: String,
}

impl ReportCardView {
    pub(crate) fn from_summary(summary: &ReportSummary) -> Self {
        Self {
            trip_id: summary.trip_id,
            ping_count: summary.ping_count,
            distance_km: format!("{:.2}", summary.total_distance),
            avg_speed_kmh: format!("{:.2}", summary.avg_speed),
            filename: summary.filename.clone(),
        }
    }
}

/// "40.0% Complete", with a running report count while still processing.
pub(crate) fn progress_text(batch: &BatchSession) -> String {
    let mut text = format!("{:.1}% Complete", batch.progress);
    if batch.status == BatchStatus::Processing {
        let _ = write!(text, " ({} reports generated)", batch.reports.len());
    }
    text
}
