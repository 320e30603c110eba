use thiserror::Error;
use ytclip_logging::clip_debug;

/// Phase of the current operation, as shown to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Succeeded | LifecycleState::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Submit,
    ValidationFailed,
    ValidationPassed,
    ResponseSucceeded,
    ResponseFailed,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no transition from {from:?} on {event:?}")]
pub struct TransitionError {
    pub from: LifecycleState,
    pub event: LifecycleEvent,
}

/// Transition table. `None` means the event is not accepted in `from`.
pub fn next_state(from: LifecycleState, event: LifecycleEvent) -> Option<LifecycleState> {
    use LifecycleEvent as E;
    use LifecycleState as S;

    match (from, event) {
        (S::Idle, E::Submit) => Some(S::Validating),
        (S::Validating, E::ValidationFailed) => Some(S::Failed),
        (S::Validating, E::ValidationPassed) => Some(S::Submitting),
        (S::Submitting, E::ResponseSucceeded) => Some(S::Succeeded),
        (S::Submitting, E::ResponseFailed) => Some(S::Failed),
        (S::Succeeded | S::Failed, E::Reset) => Some(S::Idle),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LifecycleStateMachine {
    state: LifecycleState,
}

impl LifecycleStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Applies `event`, leaving the state untouched when it is rejected.
    pub fn fire(&mut self, event: LifecycleEvent) -> Result<LifecycleState, TransitionError> {
        let next = next_state(self.state, event).ok_or(TransitionError {
            from: self.state,
            event,
        })?;
        clip_debug!("lifecycle {:?} --{:?}--> {:?}", self.state, event, next);
        self.state = next;
        Ok(next)
    }
}
