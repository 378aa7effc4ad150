//! Tripreport engine: backend HTTP client, status polling, and report saving.
mod client;
mod engine;
mod save;
mod types;

pub use client::{BackendClient, BackendSettings, ReqwestBackend};
pub use engine::{EngineConfig, EngineHandle};
pub use save::{ensure_download_dir, ReportSaver, SaveError};
pub use types::{
    ApiFailure, BatchAccepted, BatchPhase, BatchStatusReport, EngineEvent, FailureKind,
    ReportSummary, WorksheetListing,
};
