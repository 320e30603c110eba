use std::sync::Once;

use ytclip_core::{
    update, AppState, Effect, ErrorKind, Format, LifecycleState, Mode, Msg, OperationError,
    OperationResult,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ytclip_logging::initialize_for_tests);
}

fn fill(state: AppState, msgs: Vec<Msg>) -> AppState {
    msgs.into_iter().fold(state, |state, msg| update(state, msg).0)
}

fn submit_download(url: &str) -> (AppState, Vec<Effect>) {
    let state = fill(
        AppState::new(),
        vec![
            Msg::UrlChanged(url.to_string()),
            Msg::FormatChanged(Some(Format::Mp4)),
        ],
    );
    update(state, Msg::SubmitClicked)
}

fn clip_result() -> OperationResult {
    OperationResult {
        title: None,
        filename: "clip.mp4".to_string(),
        download_url: Some("/api/download-file/clip.mp4".to_string()),
        start_time: Some("00:00:10".to_string()),
        end_time: Some("00:00:40".to_string()),
    }
}

#[test]
fn download_submission_emits_single_request() {
    init_logging();
    let (state, effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");

    assert_eq!(state.phase(), LifecycleState::Submitting);
    assert_eq!(effects.len(), 1);
    let Effect::Submit { op_id, request } = &effects[0] else {
        panic!("expected submit effect, got {effects:?}");
    };
    assert_eq!(*op_id, 1);
    assert_eq!(request.endpoint().path(), "/api/download");
    assert_eq!(request.source_url(), "https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(request.format(), Some(Format::Mp4));
    assert_eq!(request.clip_range(), None);

    let view = state.view();
    assert!(view.busy);
    assert_eq!(view.preview.unwrap().video_id, "dQw4w9WgXcQ");
}

#[test]
fn resubmitting_while_submitting_is_a_silent_noop() {
    init_logging();
    let (mut state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");
    state.consume_dirty();
    let before = state.clone();

    let (mut next, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next, before);
    assert!(!next.consume_dirty());
}

#[test]
fn edits_during_submission_do_not_touch_captured_request() {
    init_logging();
    let (state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");
    let state = fill(
        state,
        vec![
            Msg::UrlChanged("https://youtu.be/aqz-KE-bpKQ".to_string()),
            Msg::ModeChanged(Mode::Clip),
        ],
    );

    let view = state.view();
    assert_eq!(view.phase, LifecycleState::Submitting);
    let submitted = view.submitted.unwrap();
    assert_eq!(submitted.source_url, "https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(submitted.mode, Mode::Download);
    assert_eq!(view.form.mode, Mode::Clip);
}

#[test]
fn invalid_clip_range_fails_before_any_network_call() {
    init_logging();
    let state = fill(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://youtu.be/dQw4w9WgXcQ".to_string()),
            Msg::ModeChanged(Mode::Clip),
            Msg::StartTimeChanged("00:01:23".to_string()),
            Msg::EndTimeChanged("00:00:50".to_string()),
        ],
    );

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), LifecycleState::Failed);
    let view = state.view();
    assert_eq!(view.error.unwrap().cause, ErrorKind::InvalidTimeRange);
    assert!(view.submitted.is_none());
}

#[test]
fn invalid_url_fails_validation() {
    init_logging();
    let (state, effects) = submit_download("https://example.com/video");
    assert!(effects.is_empty());
    assert_eq!(state.phase(), LifecycleState::Failed);
    assert_eq!(state.view().error.unwrap().cause, ErrorKind::InvalidUrl);
    assert!(state.view().preview.is_none());
}

#[test]
fn download_mode_ignores_bad_time_fields() {
    init_logging();
    let state = fill(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://youtu.be/dQw4w9WgXcQ".to_string()),
            Msg::StartTimeChanged("garbage".to_string()),
        ],
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(state.phase(), LifecycleState::Submitting);
    assert_eq!(effects.len(), 1);
}

#[test]
fn backend_error_message_is_surfaced() {
    init_logging();
    let (state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");
    let (state, effects) = update(
        state,
        Msg::OperationCompleted {
            op_id: 1,
            result: Err(OperationError::rejected("video unavailable")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), LifecycleState::Failed);
    let error = state.view().error.unwrap();
    assert_eq!(error.message, "video unavailable");
    assert_eq!(error.cause, ErrorKind::BackendRejected);
}

#[test]
fn clip_success_is_exposed_verbatim() {
    init_logging();
    let state = fill(
        AppState::new(),
        vec![
            Msg::UrlChanged("https://youtu.be/dQw4w9WgXcQ".to_string()),
            Msg::ModeChanged(Mode::Clip),
            Msg::StartTimeChanged("00:00:10".to_string()),
            Msg::EndTimeChanged("00:00:40".to_string()),
        ],
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    let Effect::Submit { op_id, request } = &effects[0] else {
        panic!("expected submit effect");
    };
    assert_eq!(request.endpoint().path(), "/api/clip");

    let (state, _) = update(
        state,
        Msg::OperationCompleted {
            op_id: *op_id,
            result: Ok(clip_result()),
        },
    );

    let view = state.view();
    assert_eq!(view.phase, LifecycleState::Succeeded);
    assert_eq!(view.result, Some(clip_result()));
    assert!(view.can_copy);
    assert!(view.error.is_none());
}

#[test]
fn stale_completion_is_ignored() {
    init_logging();
    let (state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");
    let before = state.clone();
    let (state, _) = update(
        state,
        Msg::OperationCompleted {
            op_id: 99,
            result: Ok(clip_result()),
        },
    );
    assert_eq!(state, before);
}

#[test]
fn new_submission_after_failure_starts_fresh() {
    init_logging();
    let (state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");
    let (state, _) = update(
        state,
        Msg::OperationCompleted {
            op_id: 1,
            result: Err(OperationError::network("connection refused")),
        },
    );
    assert_eq!(state.phase(), LifecycleState::Failed);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(state.phase(), LifecycleState::Submitting);
    assert!(state.view().error.is_none());
    assert!(matches!(effects.as_slice(), [Effect::Submit { op_id: 2, .. }]));
}

#[test]
fn reset_returns_terminal_state_to_idle() {
    init_logging();
    let (state, _effects) = submit_download("https://youtu.be/dQw4w9WgXcQ");

    // Reset is not accepted while a request is in flight.
    let (state, _) = update(state, Msg::ResetClicked);
    assert_eq!(state.phase(), LifecycleState::Submitting);

    let (state, _) = update(
        state,
        Msg::OperationCompleted {
            op_id: 1,
            result: Ok(clip_result()),
        },
    );
    let (state, effects) = update(state, Msg::ResetClicked);
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, LifecycleState::Idle);
    assert!(view.result.is_none());
    assert!(view.submitted.is_none());
    assert_eq!(view.form.url, "https://youtu.be/dQw4w9WgXcQ");
}

#[test]
fn submission_never_rests_in_validating() {
    init_logging();
    for url in ["https://youtu.be/dQw4w9WgXcQ", "https://example.com/video"] {
        let (state, effects) = submit_download(url);
        assert_ne!(state.phase(), LifecycleState::Validating);
        match state.phase() {
            LifecycleState::Submitting => {
                assert_eq!(effects.len(), 1);
                assert!(state.view().error.is_none());
                assert!(state.view().submitted.is_some());
            }
            LifecycleState::Failed => {
                assert!(effects.is_empty());
                assert!(state.view().error.is_some());
                assert!(state.view().submitted.is_none());
            }
            other => panic!("unexpected phase {other:?}"),
        }
    }
}
