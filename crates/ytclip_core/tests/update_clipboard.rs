use std::path::PathBuf;

use ytclip_core::{
    update, AppState, ArtifactState, Effect, Msg, OperationResult, PendingReset, SavedArtifact,
    COPIED_RESET_DELAY,
};

fn succeeded(download_url: Option<&str>) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::UrlChanged("https://youtu.be/dQw4w9WgXcQ".to_string()),
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::OperationCompleted {
            op_id: 1,
            result: Ok(OperationResult {
                title: Some("Never Gonna Give You Up".to_string()),
                filename: "rick.mp4".to_string(),
                download_url: download_url.map(ToOwned::to_owned),
                start_time: None,
                end_time: None,
            }),
        },
    );
    state
}

#[test]
fn copy_requests_clipboard_write_of_download_link() {
    let state = succeeded(Some("/api/download-file/rick.mp4"));
    let (state, effects) = update(state, Msg::CopyLinkClicked);
    assert_eq!(
        effects,
        vec![Effect::CopyToClipboard {
            text: "/api/download-file/rick.mp4".to_string()
        }]
    );
    assert!(!state.view().copied);
}

#[test]
fn copy_without_download_link_does_nothing() {
    let state = succeeded(None);
    assert!(!state.view().can_copy);
    let (_state, effects) = update(state, Msg::CopyLinkClicked);
    assert!(effects.is_empty());
}

#[test]
fn copied_flag_auto_clears_for_latest_generation_only() {
    let state = succeeded(Some("/api/download-file/rick.mp4"));

    let (state, effects) = update(state, Msg::ClipboardWritten(Ok(())));
    assert!(state.view().copied);
    assert_eq!(
        effects,
        vec![Effect::ScheduleCopiedReset(PendingReset {
            generation: 1,
            after: COPIED_RESET_DELAY,
        })]
    );

    // Copying again restarts the delay; the first reset becomes stale.
    let (state, effects) = update(state, Msg::ClipboardWritten(Ok(())));
    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleCopiedReset(PendingReset { generation: 2, .. })]
    ));

    let (state, _) = update(state, Msg::CopiedResetElapsed { generation: 1 });
    assert!(state.view().copied);

    let (state, _) = update(state, Msg::CopiedResetElapsed { generation: 2 });
    assert!(!state.view().copied);
}

#[test]
fn failed_clipboard_write_leaves_flag_unset() {
    let state = succeeded(Some("/api/download-file/rick.mp4"));
    let (state, effects) = update(state, Msg::ClipboardWritten(Err("no clipboard".into())));
    assert!(effects.is_empty());
    assert!(!state.view().copied);
}

#[test]
fn new_submission_clears_copied_flag() {
    let state = succeeded(Some("/api/download-file/rick.mp4"));
    let (state, _) = update(state, Msg::ClipboardWritten(Ok(())));
    let (state, _) = update(state, Msg::SubmitClicked);
    assert!(!state.view().copied);

    // The reset scheduled before the new submission is now stale.
    let (state, _) = update(state, Msg::CopiedResetElapsed { generation: 1 });
    assert!(!state.view().copied);
}

#[test]
fn artifact_save_flows_through_progress_to_saved() {
    let state = succeeded(Some("/api/download-file/rick.mp4"));
    let dir = PathBuf::from("downloads");

    let (state, effects) = update(state, Msg::SaveArtifactClicked { dir: dir.clone() });
    assert_eq!(
        effects,
        vec![Effect::SaveArtifact {
            op_id: 1,
            download_url: Some("/api/download-file/rick.mp4".to_string()),
            filename: "rick.mp4".to_string(),
            dir: dir.clone(),
        }]
    );

    // A second request while saving is ignored.
    let (state, effects) = update(state, Msg::SaveArtifactClicked { dir: dir.clone() });
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::ArtifactProgress {
            op_id: 1,
            bytes: 512,
            total: Some(1024),
        },
    );
    assert_eq!(
        state.view().artifact,
        ArtifactState::Saving {
            bytes: 512,
            total: Some(1024)
        }
    );

    let saved = SavedArtifact {
        path: dir.join("rick.mp4"),
        bytes: 1024,
        sha256: "ab".repeat(32),
    };
    let (state, _) = update(
        state,
        Msg::ArtifactSaved {
            op_id: 1,
            result: Ok(saved.clone()),
        },
    );
    assert_eq!(state.view().artifact, ArtifactState::Saved(saved));
}

#[test]
fn artifact_save_requires_success() {
    let (state, effects) = update(
        AppState::new(),
        Msg::SaveArtifactClicked {
            dir: PathBuf::from("downloads"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().artifact, ArtifactState::NotRequested);
}
