use ytclip_logging::{clip_debug, clip_info, clip_warn};

use crate::{
    AppState, ArtifactState, Effect, LifecycleEvent, LifecycleState, Msg, OperationError,
    OperationId, OperationResult,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::ModeChanged(mode) => {
            state.form_mut().mode = mode;
            Vec::new()
        }
        Msg::FormatChanged(format) => {
            state.form_mut().format = format;
            Vec::new()
        }
        Msg::QualityChanged(quality) => {
            state.form_mut().quality = quality;
            Vec::new()
        }
        Msg::StartTimeChanged(text) => {
            state.form_mut().start_time = text;
            Vec::new()
        }
        Msg::EndTimeChanged(text) => {
            state.form_mut().end_time = text;
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::OperationCompleted { op_id, result } => {
            complete(&mut state, op_id, result);
            Vec::new()
        }
        Msg::ResetClicked => {
            if state.phase().is_terminal() {
                reset(&mut state);
            }
            Vec::new()
        }
        Msg::CopyLinkClicked => match state.result().and_then(|r| r.download_url.clone()) {
            Some(text) if state.phase() == LifecycleState::Succeeded => {
                vec![Effect::CopyToClipboard { text }]
            }
            _ => Vec::new(),
        },
        Msg::ClipboardWritten(Ok(())) => {
            if state.phase() == LifecycleState::Succeeded {
                vec![Effect::ScheduleCopiedReset(state.arm_copied())]
            } else {
                Vec::new()
            }
        }
        Msg::ClipboardWritten(Err(reason)) => {
            clip_warn!("Clipboard write failed: {}", reason);
            Vec::new()
        }
        Msg::CopiedResetElapsed { generation } => {
            state.expire_copied(generation);
            Vec::new()
        }
        Msg::SaveArtifactClicked { dir } => {
            let saving = matches!(state.artifact(), ArtifactState::Saving { .. });
            match (state.operation().map(|op| op.id), state.result().cloned()) {
                (Some(op_id), Some(result)) if !saving => {
                    state.set_artifact(ArtifactState::Saving {
                        bytes: 0,
                        total: None,
                    });
                    vec![Effect::SaveArtifact {
                        op_id,
                        download_url: result.download_url,
                        filename: result.filename,
                        dir,
                    }]
                }
                _ => Vec::new(),
            }
        }
        Msg::ArtifactProgress {
            op_id,
            bytes,
            total,
        } => {
            if is_saving(&state, op_id) {
                state.set_artifact(ArtifactState::Saving { bytes, total });
            }
            Vec::new()
        }
        Msg::ArtifactSaved { op_id, result } => {
            if is_saving(&state, op_id) {
                state.set_artifact(match result {
                    Ok(saved) => ArtifactState::Saved(saved),
                    Err(message) => ArtifactState::Failed(message),
                });
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if let Err(kind) = state.admit_submission() {
        clip_debug!("Submit ignored: {}", kind);
        return Vec::new();
    }
    if state.phase().is_terminal() {
        reset(state);
    }
    if state.fire(LifecycleEvent::Submit).is_err() {
        return Vec::new();
    }

    let validated = state.form().to_request();
    match validated {
        Err(err) => {
            clip_info!("Validation failed: {}", err);
            if let Err(rejected) = state.fire(LifecycleEvent::ValidationFailed) {
                clip_debug!("Validation outcome dropped: {}", rejected);
                return Vec::new();
            }
            state.set_outcome(Err(err));
            Vec::new()
        }
        Ok(request) => {
            if let Err(rejected) = state.fire(LifecycleEvent::ValidationPassed) {
                clip_debug!("Submission dropped: {}", rejected);
                return Vec::new();
            }
            let op_id = state.start_operation(request.clone());
            clip_info!(
                "Submitting op_id={} mode={} url={}",
                op_id,
                request.mode(),
                request.source_url()
            );
            vec![Effect::Submit { op_id, request }]
        }
    }
}

fn complete(
    state: &mut AppState,
    op_id: OperationId,
    result: Result<OperationResult, OperationError>,
) {
    let current = state.operation().map(|op| op.id);
    if state.phase() != LifecycleState::Submitting || current != Some(op_id) {
        clip_debug!("Ignoring completion for stale op_id={}", op_id);
        return;
    }

    let event = match &result {
        Ok(done) => {
            clip_info!("op_id={} succeeded: {}", op_id, done.filename);
            LifecycleEvent::ResponseSucceeded
        }
        Err(err) => {
            clip_warn!("op_id={} failed ({}): {}", op_id, err.cause, err.message);
            LifecycleEvent::ResponseFailed
        }
    };
    if state.fire(event).is_ok() {
        state.set_outcome(result);
    }
}

fn reset(state: &mut AppState) {
    if state.fire(LifecycleEvent::Reset).is_ok() {
        state.clear_outcome();
    }
}

fn is_saving(state: &AppState, op_id: OperationId) -> bool {
    matches!(state.artifact(), ArtifactState::Saving { .. })
        && state.operation().map(|op| op.id) == Some(op_id)
}
