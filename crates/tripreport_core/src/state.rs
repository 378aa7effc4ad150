use crate::view_model::{self, AppViewModel, ProgressView, ReportCardView, WorksheetPickerView};

/// How a selected source file is classified, by extension.
///
/// Only the `.xlsx` suffix selects Excel handling; everything the picker
/// lets through otherwise is treated as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Excel,
}

/// A user-chosen source file: name plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub kind: SourceKind,
    pub payload: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        let name = name.into();
        let kind = if name.ends_with(".xlsx") {
            SourceKind::Excel
        } else {
            SourceKind::Csv
        };
        Self {
            name,
            kind,
            payload,
        }
    }
}

/// Lifecycle of a batch session.
///
/// `Submitted` is the client-side state between an accepted submission and
/// the first poll response; the wire only ever reports the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Submitted,
    Processing,
    Completed,
    Error,
}

impl BatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Error)
    }
}

/// One finished per-trip report as described by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub trip_id: i64,
    pub ping_count: u64,
    pub total_distance: f64,
    pub avg_speed: f64,
    pub filename: String,
}

/// The single active batch session. The poll loop overwrites `status`,
/// `progress`, and `reports` wholesale; the server is the source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSession {
    pub id: String,
    pub status: BatchStatus,
    pub progress: f64,
    pub reports: Vec<ReportSummary>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    selected_file: Option<SourceFile>,
    worksheets: Vec<String>,
    selected_worksheet: Option<String>,
    batch: Option<BatchSession>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SourceFile> {
        self.selected_file.as_ref()
    }

    pub fn selected_worksheet(&self) -> Option<&str> {
        self.selected_worksheet.as_deref()
    }

    pub fn batch(&self) -> Option<&BatchSession> {
        self.batch.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let file_label = match &self.selected_file {
            Some(file) => file.name.clone(),
            None => view_model::FILE_PROMPT.to_string(),
        };
        let worksheet_picker = if self.worksheets.is_empty() {
            None
        } else {
            Some(WorksheetPickerView {
                options: self.worksheets.clone(),
                selected: self.selected_worksheet.clone(),
            })
        };
        let progress = match &self.batch {
            Some(batch) if self.loading => Some(ProgressView {
                percent: batch.progress,
                text: view_model::progress_text(batch),
            }),
            _ => None,
        };
        let report_cards = self
            .batch
            .as_ref()
            .map(|batch| batch.reports.iter().map(ReportCardView::from_summary).collect())
            .unwrap_or_default();

        AppViewModel {
            file_label,
            worksheet_picker,
            generate_enabled: self.selected_file.is_some() && !self.loading,
            generate_label: if self.loading {
                "Processing..."
            } else {
                "Generate Reports"
            }
            .to_string(),
            error_banner: self.error.clone(),
            success_banner: self.notice.clone(),
            progress,
            report_cards,
        }
    }

    /// Replace the selected file and reset all downstream session state:
    /// worksheets, batch, banners. The loading flag is left alone; only
    /// submission and listing outcomes touch it.
    pub(crate) fn select_file(&mut self, file: SourceFile) {
        self.selected_file = Some(file);
        self.worksheets.clear();
        self.selected_worksheet = None;
        self.batch = None;
        self.error = None;
        self.notice = None;
        self.dirty = true;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.dirty = true;
        }
    }

    /// Store the worksheet list and default the selection to the first entry.
    pub(crate) fn set_worksheets(&mut self, worksheets: Vec<String>) {
        self.selected_worksheet = worksheets.first().cloned();
        self.worksheets = worksheets;
        self.loading = false;
        self.dirty = true;
    }

    pub(crate) fn select_worksheet(&mut self, name: String) {
        self.selected_worksheet = Some(name);
        self.dirty = true;
    }

    pub(crate) fn record_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.dirty = true;
        }
    }

    /// Entering submission: loading on, previous error gone.
    pub(crate) fn begin_submission(&mut self) {
        self.loading = true;
        self.error = None;
        self.dirty = true;
    }

    /// A submission was accepted; open the batch session. Loading stays on
    /// until a terminal poll response clears it.
    pub(crate) fn begin_batch(&mut self, id: String, message: String) {
        self.batch = Some(BatchSession {
            id,
            status: BatchStatus::Submitted,
            progress: 0.0,
            reports: Vec::new(),
        });
        self.notice = Some(message);
        self.dirty = true;
    }

    /// Overwrite the batch session with one poll response. No merging.
    pub(crate) fn apply_poll(
        &mut self,
        status: BatchStatus,
        progress: f64,
        reports: Vec<ReportSummary>,
    ) {
        if let Some(batch) = self.batch.as_mut() {
            batch.status = status;
            batch.progress = progress;
            batch.reports = reports;
            self.dirty = true;
        }
    }

    pub(crate) fn finish_completed(&mut self, notice: impl Into<String>) {
        self.loading = false;
        self.notice = Some(notice.into());
        self.dirty = true;
    }

    pub(crate) fn finish_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.dirty = true;
    }
}
