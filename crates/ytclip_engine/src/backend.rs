use std::io::{self, Write};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;
use ytclip_core::{
    interpret_response, DownloadRequest, Endpoint, OperationError, OperationId, OperationResult,
    ARTIFACT_ROUTE,
};
use ytclip_logging::{clip_debug, clip_info};

use crate::{ArtifactError, ArtifactFailureKind, EngineEvent};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Scheme, host and optional path prefix, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Covers the whole exchange; the backend downloads and transcodes
    /// before it answers, so this is generous.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
    pub max_artifact_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            max_response_bytes: 1024 * 1024,
            max_artifact_bytes: 2 * 1024 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The remote media-processing service.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// One request/response exchange; no retries.
    async fn submit(&self, request: &DownloadRequest) -> Result<OperationResult, OperationError>;

    /// Streams a produced file into `out`, reporting progress to `sink`.
    /// Returns the number of bytes written.
    async fn fetch_artifact(
        &self,
        op_id: OperationId,
        download_url: Option<&str>,
        filename: &str,
        out: &mut (dyn Write + Send),
        sink: &dyn ProgressSink,
    ) -> Result<u64, ArtifactError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn submit(&self, request: &DownloadRequest) -> Result<OperationResult, OperationError> {
        let url = endpoint_url(&self.settings.base_url, request.endpoint())
            .map_err(|err| OperationError::network(format!("invalid backend url: {err}")))?;
        let payload = request
            .to_json()
            .map_err(|err| OperationError::network(format!("could not encode request: {err}")))?;
        let client = self
            .build_client()
            .map_err(|err| OperationError::network(err.to_string()))?;

        clip_debug!("POST {} ({} bytes)", url, payload.len());
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let mut body = Vec::new();
        read_body(response, self.settings.max_response_bytes, &mut body, |_, _| {})
            .await
            .map_err(|err| match err {
                BodyError::TooLarge { .. } => OperationError::rejected("response too large"),
                BodyError::Transport(err) => network_error(err),
                BodyError::Write(err) => OperationError::network(err.to_string()),
            })?;
        clip_debug!("Backend answered HTTP {} with {} bytes", status, body.len());

        interpret_response(status, &body)
    }

    async fn fetch_artifact(
        &self,
        op_id: OperationId,
        download_url: Option<&str>,
        filename: &str,
        out: &mut (dyn Write + Send),
        sink: &dyn ProgressSink,
    ) -> Result<u64, ArtifactError> {
        let url = resolve_artifact_url(&self.settings.base_url, download_url, filename)
            .map_err(|err| ArtifactError::new(ArtifactFailureKind::InvalidUrl, err.to_string()))?;
        let client = self
            .build_client()
            .map_err(|err| ArtifactError::new(ArtifactFailureKind::Network, err.to_string()))?;

        clip_info!("Fetching artifact op_id={} from {}", op_id, url);
        let response = client.get(url).send().await.map_err(artifact_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtifactError::new(
                ArtifactFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_artifact_bytes;
        let total = response.content_length();
        if let Some(len) = total.filter(|len| *len > max_bytes) {
            return Err(ArtifactError::new(
                ArtifactFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(len),
                },
                "artifact too large",
            ));
        }

        sink.emit(EngineEvent::ArtifactProgress {
            op_id,
            bytes: 0,
            total,
        });
        read_body(response, max_bytes, out, |bytes, total| {
            sink.emit(EngineEvent::ArtifactProgress {
                op_id,
                bytes,
                total,
            })
        })
        .await
        .map_err(|err| match err {
            BodyError::TooLarge { max_bytes, actual } => ArtifactError::new(
                ArtifactFailureKind::TooLarge {
                    max_bytes,
                    actual: Some(actual),
                },
                "artifact too large",
            ),
            BodyError::Transport(err) => artifact_error(err),
            BodyError::Write(err) => {
                ArtifactError::new(ArtifactFailureKind::Persist, err.to_string())
            }
        })
    }
}

/// Full URL of an operation's endpoint. Keeps any path prefix of `base`.
pub fn endpoint_url(base: &str, endpoint: Endpoint) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", base.trim_end_matches('/'), endpoint.path()))
}

/// Where a produced file can be fetched from.
///
/// `download_url` may be absolute or relative to the backend. Without it the
/// file route is built from `filename`, encoded as a single path segment.
pub fn resolve_artifact_url(
    base: &str,
    download_url: Option<&str>,
    filename: &str,
) -> Result<Url, url::ParseError> {
    let base = Url::parse(base)?;
    if let Some(link) = download_url {
        return base.join(link);
    }

    let mut url = base.join(ARTIFACT_ROUTE)?;
    url.path_segments_mut()
        .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push(filename);
    Ok(url)
}

enum BodyError {
    TooLarge { max_bytes: u64, actual: u64 },
    Transport(reqwest::Error),
    Write(io::Error),
}

/// Copies the body into `out` chunk by chunk, never holding more than one
/// chunk in memory. Stops before `max_bytes` is exceeded.
async fn read_body(
    response: reqwest::Response,
    max_bytes: u64,
    out: &mut (dyn Write + Send),
    mut on_chunk: impl FnMut(u64, Option<u64>),
) -> Result<u64, BodyError> {
    let total = response.content_length();
    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Transport)?;
        let next_len = written + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(BodyError::TooLarge {
                max_bytes,
                actual: next_len,
            });
        }
        out.write_all(&chunk).map_err(BodyError::Write)?;
        written = next_len;
        on_chunk(written, total);
    }
    Ok(written)
}

fn network_error(err: reqwest::Error) -> OperationError {
    if err.is_timeout() {
        return OperationError::network(format!("request timed out: {err}"));
    }
    OperationError::network(err.to_string())
}

fn artifact_error(err: reqwest::Error) -> ArtifactError {
    if err.is_timeout() {
        return ArtifactError::new(ArtifactFailureKind::Timeout, err.to_string());
    }
    ArtifactError::new(ArtifactFailureKind::Network, err.to_string())
}
