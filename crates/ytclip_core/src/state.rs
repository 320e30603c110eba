use std::path::PathBuf;

use crate::view_model::{AppViewModel, SubmittedView, UrlPreview};
use crate::{
    validate_url, CopiedFlag, DownloadRequest, ErrorKind, FormState, LifecycleEvent,
    LifecycleState, LifecycleStateMachine, OperationError, OperationResult, PendingReset,
    TransitionError, VideoId,
};

pub type OperationId = u64;

/// A file fetched from the backend and written locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArtifactState {
    #[default]
    NotRequested,
    Saving {
        bytes: u64,
        total: Option<u64>,
    },
    Saved(SavedArtifact),
    Failed(String),
}

/// The submitted operation; kept from submission until the next reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operation {
    pub(crate) id: OperationId,
    pub(crate) request: DownloadRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormState,
    preview: Option<VideoId>,
    lifecycle: LifecycleStateMachine,
    last_op_id: OperationId,
    operation: Option<Operation>,
    outcome: Option<Result<OperationResult, OperationError>>,
    copied: CopiedFlag,
    artifact: ArtifactState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn view(&self) -> AppViewModel {
        let result = match &self.outcome {
            Some(Ok(result)) => Some(result.clone()),
            _ => None,
        };
        let error = match &self.outcome {
            Some(Err(err)) => Some(err.clone()),
            _ => None,
        };
        AppViewModel {
            phase: self.phase(),
            busy: self.phase() == LifecycleState::Submitting,
            form: self.form.clone(),
            preview: self.preview.as_ref().map(UrlPreview::from_id),
            submitted: self.operation.as_ref().map(|op| SubmittedView {
                op_id: op.id,
                mode: op.request.mode(),
                source_url: op.request.source_url().to_string(),
                clip_range: op.request.clip_range(),
            }),
            can_copy: result.as_ref().is_some_and(|r| r.download_url.is_some()),
            result,
            error,
            copied: self.copied.is_copied(),
            artifact: self.artifact.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        self.mark_dirty();
        &mut self.form
    }

    pub(crate) fn set_url(&mut self, url: String) {
        self.preview = validate_url(&url).ok().map(|valid| valid.video_id().clone());
        self.form_mut().url = url;
    }

    pub(crate) fn fire(&mut self, event: LifecycleEvent) -> Result<LifecycleState, TransitionError> {
        let next = self.lifecycle.fire(event)?;
        self.mark_dirty();
        Ok(next)
    }

    /// A second submission is refused while one is in flight.
    pub(crate) fn admit_submission(&self) -> Result<(), ErrorKind> {
        if self.phase() == LifecycleState::Submitting {
            return Err(ErrorKind::ConcurrentSubmissionIgnored);
        }
        Ok(())
    }

    /// Discards the previous outcome and everything derived from it.
    pub(crate) fn clear_outcome(&mut self) {
        self.operation = None;
        self.outcome = None;
        self.copied.clear();
        self.artifact = ArtifactState::NotRequested;
        self.mark_dirty();
    }

    pub(crate) fn start_operation(&mut self, request: DownloadRequest) -> OperationId {
        self.last_op_id += 1;
        self.operation = Some(Operation {
            id: self.last_op_id,
            request,
        });
        self.last_op_id
    }

    pub(crate) fn operation(&self) -> Option<&Operation> {
        self.operation.as_ref()
    }

    pub(crate) fn set_outcome(&mut self, outcome: Result<OperationResult, OperationError>) {
        self.outcome = Some(outcome);
        self.mark_dirty();
    }

    pub(crate) fn result(&self) -> Option<&OperationResult> {
        match &self.outcome {
            Some(Ok(result)) => Some(result),
            _ => None,
        }
    }

    pub(crate) fn arm_copied(&mut self) -> PendingReset {
        self.mark_dirty();
        self.copied.arm()
    }

    pub(crate) fn expire_copied(&mut self, generation: u64) {
        if self.copied.expire(generation) {
            self.mark_dirty();
        }
    }

    pub(crate) fn artifact(&self) -> &ArtifactState {
        &self.artifact
    }

    pub(crate) fn set_artifact(&mut self, artifact: ArtifactState) {
        self.artifact = artifact;
        self.mark_dirty();
    }
}
