//! ytclip engine: backend calls, artifact retrieval and effect execution.
mod backend;
mod engine;
mod filename;
mod persist;
mod types;

pub use backend::{
    endpoint_url, resolve_artifact_url, Backend, BackendSettings, ChannelProgressSink,
    ProgressSink, ReqwestBackend,
};
pub use engine::{EngineEvents, EngineHandle};
pub use filename::safe_artifact_name;
pub use persist::{ensure_output_dir, sha256_hex, ArtifactFile, ArtifactWriter, PersistError};
pub use types::{ArtifactError, ArtifactFailureKind, EngineEvent};
