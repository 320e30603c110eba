//! ytclip core: validation, request building and the pure operation state machine.
mod clipboard;
mod effect;
mod error;
mod form;
mod lifecycle;
mod msg;
mod request;
mod response;
mod state;
mod time_range;
mod update;
mod video_url;
mod view_model;

pub use clipboard::{CopiedFlag, PendingReset, COPIED_RESET_DELAY};
pub use effect::Effect;
pub use error::{ErrorKind, OperationError};
pub use form::{FormState, DEFAULT_END_TIME, DEFAULT_START_TIME};
pub use lifecycle::{
    next_state, LifecycleEvent, LifecycleState, LifecycleStateMachine, TransitionError,
};
pub use msg::Msg;
pub use request::{
    build_request, DownloadRequest, Endpoint, Format, Mode, Quality, RequestBody, Selection,
};
pub use response::{interpret_response, OperationResult, ARTIFACT_ROUTE};
pub use state::{AppState, ArtifactState, OperationId, SavedArtifact};
pub use time_range::{
    format_timestamp, parse_timestamp, validate_time_range, RangeBound, TimeRange,
    TimeRangeError,
};
pub use update::update;
pub use video_url::{validate_url, NormalizedUrl, UrlError, VideoId, VIDEO_ID_LEN};
pub use view_model::{AppViewModel, SubmittedView, UrlPreview};
