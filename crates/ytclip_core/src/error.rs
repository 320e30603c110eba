use std::fmt;

use thiserror::Error;

/// Why an operation did not produce a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUrl,
    InvalidTimeRange,
    NetworkFailure,
    /// Non-success status, or a success status with an unusable body.
    BackendRejected,
    /// A submit arrived while another operation was in flight. Never shown.
    ConcurrentSubmissionIgnored,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidUrl => write!(f, "invalid url"),
            ErrorKind::InvalidTimeRange => write!(f, "invalid time range"),
            ErrorKind::NetworkFailure => write!(f, "network failure"),
            ErrorKind::BackendRejected => write!(f, "backend rejected the request"),
            ErrorKind::ConcurrentSubmissionIgnored => write!(f, "submission already in flight"),
        }
    }
}

/// Failure value handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub message: String,
    pub cause: ErrorKind,
}

impl OperationError {
    pub fn new(cause: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailure, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendRejected, message)
    }
}
