use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Batch status values as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    Processing,
    Completed,
    Error,
}

/// Response body of `POST /list-worksheets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorksheetListing {
    pub worksheets: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response body of `POST /generate-batch-reports`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchAccepted {
    pub batch_id: String,
    pub message: String,
}

/// One finished report in a status payload. `trip_id` is integral on the
/// wire; the backend casts it before serializing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSummary {
    pub trip_id: i64,
    pub ping_count: u64,
    pub total_distance: f64,
    pub avg_speed: f64,
    pub filename: String,
}

/// Response body of `GET /batch-status/{batch_id}`. The trip counters and
/// error text are optional so older backends that omit them still parse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchStatusReport {
    pub status: BatchPhase,
    pub progress: f64,
    #[serde(default)]
    pub total_trips: Option<u64>,
    #[serde(default)]
    pub completed_trips: Option<u64>,
    #[serde(default)]
    pub pdfs: Vec<ReportSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error payload shape shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// A failed backend interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The verbatim backend-reported error text, when the backend produced
    /// one. Transport and decode failures return `None` so callers can fall
    /// back to their own fixed message.
    pub fn backend_message(&self) -> Option<&str> {
        match self.kind {
            FailureKind::Backend => Some(&self.message),
            _ => None,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiFailure {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The backend answered with an `{ "error": ... }` payload.
    Backend,
    /// Non-success HTTP status without a usable error payload.
    HttpStatus(u16),
    Timeout,
    Network,
    /// The response body did not match the expected JSON shape.
    Decode,
    /// The PDF arrived but could not be written to disk.
    Save,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Backend => write!(f, "backend error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Save => write!(f, "save error"),
        }
    }
}

/// Events the engine reports back to the driving layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    WorksheetsListed {
        result: Result<WorksheetListing, ApiFailure>,
    },
    BatchSubmitted {
        result: Result<BatchAccepted, ApiFailure>,
    },
    /// One poll response, tagged with the batch it was issued for.
    StatusFetched {
        batch_id: String,
        result: Result<BatchStatusReport, ApiFailure>,
    },
    /// A download finished; on success carries the saved path.
    ReportSaved {
        filename: String,
        result: Result<PathBuf, ApiFailure>,
    },
}
