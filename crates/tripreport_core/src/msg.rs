#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a source file from the file picker.
    FileSelected { name: String, payload: Vec<u8> },
    /// Worksheet names came back for the selected Excel file.
    WorksheetsLoaded { worksheets: Vec<String> },
    /// The worksheet listing request failed; carries the backend message if any.
    WorksheetListFailed { message: Option<String> },
    /// User picked a worksheet from the selector.
    WorksheetSelected(String),
    /// User clicked Generate Reports.
    GenerateClicked,
    /// The batch submission was accepted by the backend.
    SubmitSucceeded {
        batch_id: String,
        message: String,
    },
    /// The batch submission failed; carries the backend message if any.
    SubmitFailed { message: Option<String> },
    /// One status poll response for the active batch.
    PollTick {
        status: crate::BatchStatus,
        progress: f64,
        reports: Vec<crate::ReportSummary>,
        error: Option<String>,
    },
    /// A status poll request failed outright (no usable payload).
    PollFailed,
    /// User clicked download on a finished report.
    DownloadClicked { filename: String },
    /// The download request failed; carries the backend message if any.
    DownloadFailed { message: Option<String> },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
