//! Tripreport core: pure upload/report session state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, BatchSession, BatchStatus, ReportSummary, SourceFile, SourceKind};
pub use update::{
    update, FALLBACK_BATCH, FALLBACK_DOWNLOAD, FALLBACK_SUBMIT, FALLBACK_WORKSHEET_LIST,
    MSG_BATCH_COMPLETE, MSG_POLL_FAILED, MSG_SELECT_FILE_FIRST, MSG_SELECT_WORKSHEET,
};
pub use view_model::{
    AppViewModel, ProgressView, ReportCardView, WorksheetPickerView, FILE_PROMPT,
};
