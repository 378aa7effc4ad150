use crate::{AppState, BatchStatus, Effect, Msg, SourceFile, SourceKind};

/// Local validation error: generate clicked with no file selected.
pub const MSG_SELECT_FILE_FIRST: &str = "Please select a CSV or Excel file first";
/// Local validation error: Excel file submitted without a worksheet.
pub const MSG_SELECT_WORKSHEET: &str = "Please select a worksheet";
/// Success banner once a batch reaches `completed`.
pub const MSG_BATCH_COMPLETE: &str = "All PDF reports generated successfully!";
/// Fixed message for a failed status poll request.
pub const MSG_POLL_FAILED: &str = "Error checking batch status";
/// Fallback when the worksheet listing fails without a backend message.
pub const FALLBACK_WORKSHEET_LIST: &str = "Error reading Excel file";
/// Fallback when batch submission fails without a backend message.
pub const FALLBACK_SUBMIT: &str = "Error uploading file";
/// Fallback when the batch itself reports `error` without a message.
pub const FALLBACK_BATCH: &str = "Error generating reports";
/// Fallback when a report download fails without a backend message.
pub const FALLBACK_DOWNLOAD: &str = "Error downloading PDF";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected { name, payload } => {
            let file = SourceFile::new(name, payload);
            let mut effects = Vec::new();
            if state.batch().is_some() {
                // The batch identifier is clearing; the poll task goes with it.
                effects.push(Effect::StopPolling);
            }
            let list_worksheets = file.kind == SourceKind::Excel;
            if list_worksheets {
                effects.push(Effect::ListWorksheets {
                    file_name: file.name.clone(),
                    payload: file.payload.clone(),
                });
            }
            state.select_file(file);
            if list_worksheets {
                state.set_loading(true);
            }
            effects
        }
        Msg::WorksheetsLoaded { worksheets } => {
            state.set_worksheets(worksheets);
            Vec::new()
        }
        Msg::WorksheetListFailed { message } => {
            state.record_error(message.unwrap_or_else(|| FALLBACK_WORKSHEET_LIST.to_string()));
            state.set_loading(false);
            Vec::new()
        }
        Msg::WorksheetSelected(name) => {
            state.select_worksheet(name);
            Vec::new()
        }
        Msg::GenerateClicked => {
            // Preconditions, checked in order: a file, then a worksheet for Excel.
            let request = match state.selected_file() {
                None => Err(MSG_SELECT_FILE_FIRST),
                Some(file) if file.kind == SourceKind::Excel => {
                    match state.selected_worksheet() {
                        None => Err(MSG_SELECT_WORKSHEET),
                        Some(worksheet) => Ok((
                            file.name.clone(),
                            file.payload.clone(),
                            Some(worksheet.to_string()),
                        )),
                    }
                }
                Some(file) => Ok((file.name.clone(), file.payload.clone(), None)),
            };
            match request {
                Err(message) => {
                    state.record_error(message);
                    Vec::new()
                }
                Ok((file_name, payload, worksheet_name)) => {
                    state.begin_submission();
                    vec![Effect::SubmitBatch {
                        file_name,
                        payload,
                        worksheet_name,
                    }]
                }
            }
        }
        Msg::SubmitSucceeded { batch_id, message } => {
            state.begin_batch(batch_id.clone(), message);
            vec![Effect::StartPolling { batch_id }]
        }
        Msg::SubmitFailed { message } => {
            state.record_error(message.unwrap_or_else(|| FALLBACK_SUBMIT.to_string()));
            state.set_loading(false);
            Vec::new()
        }
        Msg::PollTick {
            status,
            progress,
            reports,
            error,
        } => {
            if state.batch().is_none() {
                // Late response for a session that was reset; nothing to overwrite.
                return (state, Vec::new());
            }
            state.apply_poll(status, progress, reports);
            match status {
                BatchStatus::Completed => {
                    state.finish_completed(MSG_BATCH_COMPLETE);
                    vec![Effect::StopPolling]
                }
                BatchStatus::Error => {
                    state.finish_failed(error.unwrap_or_else(|| FALLBACK_BATCH.to_string()));
                    vec![Effect::StopPolling]
                }
                BatchStatus::Submitted | BatchStatus::Processing => Vec::new(),
            }
        }
        Msg::PollFailed => {
            // The error is surfaced and loading cleared, but no StopPolling is
            // emitted: the poll keeps firing every second until the status
            // reaches a terminal value.
            state.record_error(MSG_POLL_FAILED);
            state.set_loading(false);
            Vec::new()
        }
        Msg::DownloadClicked { filename } => {
            state.clear_error();
            vec![Effect::DownloadReport { filename }]
        }
        Msg::DownloadFailed { message } => {
            state.record_error(message.unwrap_or_else(|| FALLBACK_DOWNLOAD.to_string()));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
