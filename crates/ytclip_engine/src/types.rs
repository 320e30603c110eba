use std::fmt;

use thiserror::Error;
use ytclip_core::{OperationError, OperationId, OperationResult, SavedArtifact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    OperationCompleted {
        op_id: OperationId,
        result: Result<OperationResult, OperationError>,
    },
    ArtifactProgress {
        op_id: OperationId,
        bytes: u64,
        total: Option<u64>,
    },
    ArtifactCompleted {
        op_id: OperationId,
        result: Result<SavedArtifact, ArtifactError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ArtifactError {
    pub kind: ArtifactFailureKind,
    pub message: String,
}

impl ArtifactError {
    pub(crate) fn new(kind: ArtifactFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    Persist,
}

impl fmt::Display for ArtifactFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFailureKind::InvalidUrl => write!(f, "invalid artifact url"),
            ArtifactFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ArtifactFailureKind::Timeout => write!(f, "timeout"),
            ArtifactFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "artifact too large (max {max_bytes}, actual {actual:?})")
            }
            ArtifactFailureKind::Network => write!(f, "network error"),
            ArtifactFailureKind::Persist => write!(f, "could not write file"),
        }
    }
}
