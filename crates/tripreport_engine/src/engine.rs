use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use session_logging::{session_debug, session_info};
use tokio_util::sync::CancellationToken;

use crate::client::{BackendClient, BackendSettings, ReqwestBackend};
use crate::save::ReportSaver;
use crate::types::{ApiFailure, EngineEvent, FailureKind};

/// Engine construction settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub settings: BackendSettings,
    /// Where downloaded PDFs are saved.
    pub download_dir: PathBuf,
    /// Status poll cadence. One second in production; tests shorten it.
    pub poll_interval: Duration,
}

impl EngineConfig {
    pub fn with_download_dir(download_dir: PathBuf) -> Self {
        Self {
            settings: BackendSettings::default(),
            download_dir,
            poll_interval: Duration::from_secs(1),
        }
    }
}

enum EngineCommand {
    ListWorksheets {
        file_name: String,
        payload: Vec<u8>,
    },
    SubmitBatch {
        file_name: String,
        payload: Vec<u8>,
        worksheet_name: Option<String>,
    },
    StartPolling {
        batch_id: String,
    },
    StopPolling,
    Download {
        filename: String,
    },
}

/// Handle to the IO thread. Commands go in over a channel; results come back
/// as [`EngineEvent`]s on the receiver returned at construction. Dropping
/// every handle closes the command channel, which ends the IO thread and
/// aborts any poll task still running.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<(Self, mpsc::Receiver<EngineEvent>), ApiFailure> {
        let client = Arc::new(ReqwestBackend::new(config.settings.clone())?);
        Ok(Self::with_client(client, config))
    }

    /// Build the engine over any [`BackendClient`], e.g. a scripted fake.
    pub fn with_client(
        client: Arc<dyn BackendClient>,
        config: EngineConfig,
    ) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let saver = ReportSaver::new(config.download_dir.clone());
        let poll_interval = config.poll_interval;

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // Exactly one poll task may run; this token cancels it.
            let mut poll_guard: Option<CancellationToken> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { batch_id } => {
                        if let Some(token) = poll_guard.take() {
                            token.cancel();
                        }
                        session_info!("starting status poll for batch {}", batch_id);
                        let token = CancellationToken::new();
                        poll_guard = Some(token.clone());
                        runtime.spawn(poll_status(
                            client.clone(),
                            batch_id,
                            poll_interval,
                            event_tx.clone(),
                            token,
                        ));
                    }
                    EngineCommand::StopPolling => {
                        if let Some(token) = poll_guard.take() {
                            session_info!("stopping status poll");
                            token.cancel();
                        }
                    }
                    EngineCommand::ListWorksheets { file_name, payload } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = client.list_worksheets(&file_name, payload).await;
                            let _ = event_tx.send(EngineEvent::WorksheetsListed { result });
                        });
                    }
                    EngineCommand::SubmitBatch {
                        file_name,
                        payload,
                        worksheet_name,
                    } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = client
                                .submit_batch(&file_name, payload, worksheet_name.as_deref())
                                .await;
                            let _ = event_tx.send(EngineEvent::BatchSubmitted { result });
                        });
                    }
                    EngineCommand::Download { filename } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        let saver = saver.clone();
                        runtime.spawn(async move {
                            let result = match client.download_pdf(&filename).await {
                                Ok(bytes) => saver
                                    .save(&filename, &bytes)
                                    .map_err(|err| {
                                        ApiFailure::new(FailureKind::Save, err.to_string())
                                    }),
                                Err(err) => Err(err),
                            };
                            let _ = event_tx.send(EngineEvent::ReportSaved { filename, result });
                        });
                    }
                }
            }

            // Command channel closed: cancel the poll and let the runtime
            // drop, aborting anything still in flight.
            if let Some(token) = poll_guard.take() {
                token.cancel();
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn list_worksheets(&self, file_name: impl Into<String>, payload: Vec<u8>) {
        let _ = self.cmd_tx.send(EngineCommand::ListWorksheets {
            file_name: file_name.into(),
            payload,
        });
    }

    pub fn submit_batch(
        &self,
        file_name: impl Into<String>,
        payload: Vec<u8>,
        worksheet_name: Option<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitBatch {
            file_name: file_name.into(),
            payload,
            worksheet_name,
        });
    }

    pub fn start_polling(&self, batch_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            batch_id: batch_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn download(&self, filename: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            filename: filename.into(),
        });
    }
}

/// The poll task for one batch id. Cancellation is the only way this stops;
/// the controller decides when the session is over. A request already in
/// flight when the token fires still delivers its event.
async fn poll_status(
    client: Arc<dyn BackendClient>,
    batch_id: String,
    interval: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        session_debug!("polling status for batch {}", batch_id);
        let result = client.batch_status(&batch_id).await;
        let delivered = event_tx.send(EngineEvent::StatusFetched {
            batch_id: batch_id.clone(),
            result,
        });
        if delivered.is_err() {
            break;
        }
    }
}
