use std::path::PathBuf;

use crate::{Format, Mode, OperationError, OperationId, OperationResult, Quality, SavedArtifact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    UrlChanged(String),
    ModeChanged(Mode),
    FormatChanged(Option<Format>),
    QualityChanged(Option<Quality>),
    StartTimeChanged(String),
    EndTimeChanged(String),
    /// User pressed the download/clip button.
    SubmitClicked,
    /// The backend exchange for an operation finished.
    OperationCompleted {
        op_id: OperationId,
        result: Result<OperationResult, OperationError>,
    },
    /// User cleared the last result or error.
    ResetClicked,
    CopyLinkClicked,
    /// Outcome of the clipboard write requested by `Effect::CopyToClipboard`.
    ClipboardWritten(Result<(), String>),
    /// A scheduled reset of the copied confirmation fired.
    CopiedResetElapsed { generation: u64 },
    /// User asked to store the produced file locally.
    SaveArtifactClicked { dir: PathBuf },
    ArtifactProgress {
        op_id: OperationId,
        bytes: u64,
        total: Option<u64>,
    },
    ArtifactSaved {
        op_id: OperationId,
        result: Result<SavedArtifact, String>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
