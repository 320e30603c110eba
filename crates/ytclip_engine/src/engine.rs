use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ytclip_core::{DownloadRequest, OperationId, SavedArtifact};
use ytclip_logging::{clip_debug, clip_error, clip_info, clip_warn};

use crate::backend::{Backend, BackendSettings, ChannelProgressSink, ReqwestBackend};
use crate::{
    safe_artifact_name, ArtifactError, ArtifactFailureKind, ArtifactFile, EngineEvent, PersistError,
};

enum EngineCommand {
    Submit {
        op_id: OperationId,
        request: DownloadRequest,
    },
    SaveArtifact {
        op_id: OperationId,
        download_url: Option<String>,
        filename: String,
        dir: PathBuf,
    },
}

/// Sends work to the background runtime.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving side for everything the engine reports.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> io::Result<(Self, EngineEvents)> {
        Self::with_backend(Arc::new(ReqwestBackend::new(settings)))
    }

    /// Starts the engine thread around any backend implementation.
    pub fn with_backend(backend: Arc<dyn Backend>) -> io::Result<(Self, EngineEvents)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("ytclip-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("ytclip-engine-commands".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, event_tx).await;
                    });
                }
            })?;

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn submit(&self, op_id: OperationId, request: DownloadRequest) {
        self.send(EngineCommand::Submit { op_id, request });
    }

    pub fn save_artifact(
        &self,
        op_id: OperationId,
        download_url: Option<String>,
        filename: String,
        dir: PathBuf,
    ) {
        self.send(EngineCommand::SaveArtifact {
            op_id,
            download_url,
            filename,
            dir,
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            clip_error!("Engine thread is gone; command dropped");
        }
    }
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { op_id, request } => {
            let result = backend.submit(&request).await;
            let _ = event_tx.send(EngineEvent::OperationCompleted { op_id, result });
        }
        EngineCommand::SaveArtifact {
            op_id,
            download_url,
            filename,
            dir,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result =
                save_artifact(backend, op_id, download_url.as_deref(), &filename, dir, &sink).await;
            match &result {
                Ok(saved) => clip_info!(
                    "Saved artifact op_id={} to {:?} ({} bytes)",
                    op_id,
                    saved.path,
                    saved.bytes
                ),
                Err(err) => clip_warn!("Artifact op_id={} failed: {}", op_id, err),
            }
            let _ = event_tx.send(EngineEvent::ArtifactCompleted { op_id, result });
        }
    }
}

/// Streams the artifact straight into a temp file next to its final name.
async fn save_artifact(
    backend: &dyn Backend,
    op_id: OperationId,
    download_url: Option<&str>,
    filename: &str,
    dir: PathBuf,
    sink: &ChannelProgressSink,
) -> Result<SavedArtifact, ArtifactError> {
    let name = safe_artifact_name(filename);
    let mut file = run_blocking(move || ArtifactFile::create(&dir, &name)).await?;
    let fetched = backend
        .fetch_artifact(op_id, download_url, filename, &mut file, sink)
        .await?;
    clip_debug!("op_id={} streamed {} bytes", op_id, fetched);
    run_blocking(move || file.finish()).await
}

async fn run_blocking<T, F>(work: F) -> Result<T, ArtifactError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PersistError> + Send + 'static,
{
    let persist_error = |message: String| ArtifactError::new(ArtifactFailureKind::Persist, message);
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| persist_error(err.to_string()))?
        .map_err(|err| persist_error(err.to_string()))
}
