/// IO requests emitted by `update` for the platform layer to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// POST the file to the worksheet-listing endpoint.
    ListWorksheets { file_name: String, payload: Vec<u8> },
    /// POST the file (and worksheet name for Excel) to start batch generation.
    SubmitBatch {
        file_name: String,
        payload: Vec<u8>,
        worksheet_name: Option<String>,
    },
    /// Start the once-per-second status poll for this batch.
    /// Replaces any poll task already running for a previous batch.
    StartPolling { batch_id: String },
    /// Cancel the active poll task, if any.
    StopPolling,
    /// Fetch one finished report and save it under its filename.
    DownloadReport { filename: String },
}
