use std::sync::mpsc;
use std::thread;

use session_logging::{session_info, session_warn};
use tripreport_core::{BatchStatus, Effect, Msg, ReportSummary};
use tripreport_engine::{ApiFailure, BatchPhase, EngineConfig, EngineEvent, EngineHandle};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(event_tx: mpsc::Sender<AppEvent>, config: EngineConfig) -> Result<Self, ApiFailure> {
        let (engine, engine_events) = EngineHandle::new(config)?;
        spawn_event_pump(engine_events, event_tx);
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ListWorksheets { file_name, payload } => {
                    session_info!("ListWorksheets file={} bytes={}", file_name, payload.len());
                    self.engine.list_worksheets(file_name, payload);
                }
                Effect::SubmitBatch {
                    file_name,
                    payload,
                    worksheet_name,
                } => {
                    session_info!(
                        "SubmitBatch file={} bytes={} worksheet={:?}",
                        file_name,
                        payload.len(),
                        worksheet_name
                    );
                    self.engine.submit_batch(file_name, payload, worksheet_name);
                }
                Effect::StartPolling { batch_id } => {
                    self.engine.start_polling(batch_id);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::DownloadReport { filename } => {
                    session_info!("DownloadReport {}", filename);
                    self.engine.download(filename);
                }
            }
        }
    }
}

/// Forward engine events into core messages. Backend-reported error text
/// travels verbatim; core applies the per-call-site fallback when there is
/// none.
fn spawn_event_pump(engine_events: mpsc::Receiver<EngineEvent>, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = engine_events.recv() {
            let msg = match event {
                EngineEvent::WorksheetsListed { result } => match result {
                    Ok(listing) => Msg::WorksheetsLoaded {
                        worksheets: listing.worksheets,
                    },
                    Err(err) => {
                        session_warn!("worksheet listing failed: {}", err);
                        Msg::WorksheetListFailed {
                            message: err.backend_message().map(str::to_string),
                        }
                    }
                },
                EngineEvent::BatchSubmitted { result } => match result {
                    Ok(accepted) => Msg::SubmitSucceeded {
                        batch_id: accepted.batch_id,
                        message: accepted.message,
                    },
                    Err(err) => {
                        session_warn!("batch submission failed: {}", err);
                        Msg::SubmitFailed {
                            message: err.backend_message().map(str::to_string),
                        }
                    }
                },
                EngineEvent::StatusFetched { result, .. } => match result {
                    Ok(report) => Msg::PollTick {
                        status: map_phase(report.status),
                        progress: report.progress,
                        reports: report.pdfs.into_iter().map(map_summary).collect(),
                        error: report.error,
                    },
                    Err(err) => {
                        session_warn!("status poll failed: {}", err);
                        Msg::PollFailed
                    }
                },
                EngineEvent::ReportSaved { filename, result } => match result {
                    Ok(path) => {
                        session_info!("saved {} to {}", filename, path.display());
                        println!("Saved {}", path.display());
                        Msg::NoOp
                    }
                    Err(err) => {
                        session_warn!("download of {} failed: {}", filename, err);
                        Msg::DownloadFailed {
                            message: err.backend_message().map(str::to_string),
                        }
                    }
                },
            };
            if event_tx.send(AppEvent::Core(msg)).is_err() {
                break;
            }
        }
    });
}

fn map_phase(phase: BatchPhase) -> BatchStatus {
    match phase {
        BatchPhase::Processing => BatchStatus::Processing,
        BatchPhase::Completed => BatchStatus::Completed,
        BatchPhase::Error => BatchStatus::Error,
    }
}

fn map_summary(summary: tripreport_engine::ReportSummary) -> ReportSummary {
    ReportSummary {
        trip_id: summary.trip_id,
        ping_count: summary.ping_count,
        total_distance: summary.total_distance,
        avg_speed: summary.avg_speed,
        filename: summary.filename,
    }
}
