use std::path::PathBuf;

use crate::{DownloadRequest, OperationId, PendingReset};

/// Work the host must perform on behalf of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the backend call. Emitted exactly once per accepted submission.
    Submit {
        op_id: OperationId,
        request: DownloadRequest,
    },
    /// Write a result link to the clipboard and report back with
    /// `Msg::ClipboardWritten`. The link may be relative to the backend.
    CopyToClipboard { text: String },
    /// Deliver `Msg::CopiedResetElapsed` after the delay, replacing any
    /// reset that is still pending.
    ScheduleCopiedReset(PendingReset),
    /// Fetch the produced file and store it under `dir`.
    SaveArtifact {
        op_id: OperationId,
        download_url: Option<String>,
        filename: String,
        dir: PathBuf,
    },
}
