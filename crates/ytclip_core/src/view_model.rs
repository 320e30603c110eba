use crate::{
    ArtifactState, FormState, LifecycleState, Mode, OperationError, OperationId, OperationResult,
    TimeRange, VideoId,
};

/// Snapshot handed to the presentation layer after each update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: LifecycleState,
    pub busy: bool,
    pub form: FormState,
    pub preview: Option<UrlPreview>,
    pub submitted: Option<SubmittedView>,
    pub result: Option<OperationResult>,
    pub error: Option<OperationError>,
    pub can_copy: bool,
    pub copied: bool,
    pub artifact: ArtifactState,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPreview {
    pub video_id: String,
    pub watch_url: String,
    pub thumbnail_url: String,
}

impl UrlPreview {
    pub(crate) fn from_id(id: &VideoId) -> Self {
        Self {
            video_id: id.as_str().to_string(),
            watch_url: id.watch_url(),
            thumbnail_url: id.thumbnail_url(),
        }
    }
}

/// The request that produced the current phase, as captured at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedView {
    pub op_id: OperationId,
    pub mode: Mode,
    pub source_url: String,
    pub clip_range: Option<TimeRange>,
}
