use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytclip_core::{
    build_request, validate_time_range, validate_url, DownloadRequest, ErrorKind, Format,
    OperationResult, Selection,
};
use ytclip_engine::{
    ArtifactFailureKind, Backend, BackendSettings, EngineEvent, ProgressSink, ReqwestBackend,
};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
}

fn download_request() -> DownloadRequest {
    let url = validate_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
    build_request(&url, Selection::Download, Some(Format::Mp4), None)
}

#[tokio::test]
async fn download_posts_json_body_to_download_endpoint() {
    ytclip_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "video_url": "https://youtu.be/dQw4w9WgXcQ",
            "format": "mp4",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Never Gonna Give You Up",
            "filename": "rick.mp4",
            "download_url": "/api/download-file/rick.mp4",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_for(&server).submit(&download_request()).await.unwrap();
    assert_eq!(
        result,
        OperationResult {
            title: Some("Never Gonna Give You Up".to_string()),
            filename: "rick.mp4".to_string(),
            download_url: Some("/api/download-file/rick.mp4".to_string()),
            start_time: None,
            end_time: None,
        }
    );
}

#[tokio::test]
async fn clip_posts_time_bounds_to_clip_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clip"))
        .and(body_json(json!({
            "video_url": "https://youtu.be/dQw4w9WgXcQ",
            "start_time": "00:00:10",
            "end_time": "00:00:40",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "clip.mp4",
            "download_url": "/api/download-file/clip.mp4",
            "start_time": "00:00:10",
            "end_time": "00:00:40",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = validate_url("https://youtu.be/dQw4w9WgXcQ").unwrap();
    let range = validate_time_range("00:00:10", "00:00:40").unwrap();
    let request = build_request(&url, Selection::Clip(range), None, None);

    let result = backend_for(&server).submit(&request).await.unwrap();
    assert_eq!(result.filename, "clip.mp4");
    assert_eq!(result.start_time.as_deref(), Some("00:00:10"));
    assert_eq!(result.end_time.as_deref(), Some("00:00:40"));
}

#[tokio::test]
async fn backend_detail_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "video unavailable"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .submit(&download_request())
        .await
        .unwrap_err();
    assert_eq!(err.cause, ErrorKind::BackendRejected);
    assert_eq!(err.message, "video unavailable");
}

#[tokio::test]
async fn success_without_filename_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "x"})))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .submit(&download_request())
        .await
        .unwrap_err();
    assert_eq!(err.cause, ErrorKind::BackendRejected);
}

#[tokio::test]
async fn slow_backend_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"filename": "late.mp4"})),
        )
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    });
    let err = backend.submit(&download_request()).await.unwrap_err();
    assert_eq!(err.cause, ErrorKind::NetworkFailure);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: uri,
        connect_timeout: Duration::from_millis(200),
        ..BackendSettings::default()
    });
    let err = backend.submit(&download_request()).await.unwrap_err();
    assert_eq!(err.cause, ErrorKind::NetworkFailure);
}

#[tokio::test]
async fn artifact_is_fetched_with_progress() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/rick.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"0123456789".to_vec()))
        .mount(&server)
        .await;

    let sink = TestSink::default();
    let mut content = Vec::new();
    let written = backend_for(&server)
        .fetch_artifact(
            4,
            Some("/api/download-file/rick.mp4"),
            "rick.mp4",
            &mut content,
            &sink,
        )
        .await
        .unwrap();
    assert_eq!(written, 10);
    assert_eq!(content, b"0123456789");

    let progress: Vec<u64> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::ArtifactProgress { op_id: 4, bytes, .. } => Some(bytes),
            _ => None,
        })
        .collect();
    assert_eq!(progress.first(), Some(&0));
    assert_eq!(progress.last(), Some(&10));
}

#[tokio::test]
async fn artifact_route_is_built_from_filename_when_link_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/my%20clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let mut content = Vec::new();
    backend_for(&server)
        .fetch_artifact(1, None, "my clip.mp4", &mut content, &TestSink::default())
        .await
        .unwrap();
    assert_eq!(content, b"data");
}

#[tokio::test]
async fn artifact_http_error_and_size_limit_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/gone.mp4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/big.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        max_artifact_bytes: 16,
        ..BackendSettings::default()
    });
    let sink = TestSink::default();

    let err = backend
        .fetch_artifact(1, None, "gone.mp4", &mut Vec::new(), &sink)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ArtifactFailureKind::HttpStatus(404));

    let err = backend
        .fetch_artifact(2, None, "big.mp4", &mut Vec::new(), &sink)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        ArtifactFailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(64)
        }
    );
}

struct FailingWriter;

impl std::io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn artifact_write_failure_is_a_persist_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download-file/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .fetch_artifact(1, None, "clip.mp4", &mut FailingWriter, &TestSink::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ArtifactFailureKind::Persist);
    assert!(err.message.contains("disk full"), "{}", err.message);
}
