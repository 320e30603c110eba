use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use ytclip_core::{update, AppState, AppViewModel, Effect, LifecycleState, Msg};
use ytclip_engine::{EngineEvent, EngineEvents, EngineHandle};
use ytclip_logging::{clip_debug, clip_info};

use crate::clipboard::ClipboardSink;
use crate::history::{HistoryEntry, HistoryStore};
use crate::render;
use crate::timer::ResetTimer;

/// Everything the session loop reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    Msg(Msg),
    Status,
    Help,
    Quit,
}

impl From<Msg> for SessionEvent {
    fn from(msg: Msg) -> Self {
        SessionEvent::Msg(msg)
    }
}

/// Owns the state and runs effects; all messages pass through one inbox.
pub struct Session {
    state: AppState,
    last_view: AppViewModel,
    engine: EngineHandle,
    clipboard: Box<dyn ClipboardSink>,
    timer: ResetTimer,
    history: Option<HistoryStore>,
    base_url: String,
    inbox_tx: mpsc::Sender<SessionEvent>,
    inbox_rx: mpsc::Receiver<SessionEvent>,
    out: Box<dyn Write>,
}

impl Session {
    pub fn new(
        engine: EngineHandle,
        events: EngineEvents,
        base_url: String,
        clipboard: Box<dyn ClipboardSink>,
        history: Option<HistoryStore>,
        out: Box<dyn Write>,
    ) -> io::Result<Self> {
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let timer = ResetTimer::spawn(inbox_tx.clone())?;
        spawn_event_forwarder(events, inbox_tx.clone())?;
        let state = AppState::new();
        Ok(Self {
            last_view: state.view(),
            state,
            engine,
            clipboard,
            timer,
            history,
            base_url,
            inbox_tx,
            inbox_rx,
            out,
        })
    }

    /// Sender for input sources such as the shell's stdin reader.
    pub fn sender(&self) -> mpsc::Sender<SessionEvent> {
        self.inbox_tx.clone()
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        self.state = state;
        self.run_effects(effects);
        if changed {
            self.render();
        }
    }

    /// Handles queued events without blocking.
    pub fn drain(&mut self) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.handle(event);
        }
    }

    /// Blocks until `done` holds for the current view.
    pub fn run_until(&mut self, done: impl Fn(&AppViewModel) -> bool) -> AppViewModel {
        loop {
            let view = self.state.view();
            if done(&view) {
                return view;
            }
            match self.inbox_rx.recv() {
                Ok(event) => self.handle(event),
                Err(_) => return view,
            }
        }
    }

    /// Runs until a `Quit` arrives.
    pub fn run_interactive(&mut self) {
        self.print(&["Type `help` for commands.".to_string()]);
        while let Ok(event) = self.inbox_rx.recv() {
            if matches!(event, SessionEvent::Quit) {
                break;
            }
            self.handle(event);
        }
    }

    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Msg(msg) => self.dispatch(msg),
            SessionEvent::Status => {
                let lines = render::summary(&self.state.view(), &self.base_url);
                self.print(&lines);
            }
            SessionEvent::Help => self.print(&crate::shell::help_lines()),
            SessionEvent::Quit => {}
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Submit { op_id, request } => {
                    clip_info!("Submit op_id={} mode={}", op_id, request.mode());
                    self.engine.submit(op_id, request);
                }
                Effect::CopyToClipboard { text } => {
                    let link = render::absolute_link(&self.base_url, &text);
                    let written = self.clipboard.write_text(&link).map_err(|e| e.to_string());
                    let _ = self.inbox_tx.send(Msg::ClipboardWritten(written).into());
                }
                Effect::ScheduleCopiedReset(pending) => {
                    clip_debug!("Copied reset scheduled, generation {}", pending.generation);
                    self.timer.schedule(pending);
                }
                Effect::SaveArtifact {
                    op_id,
                    download_url,
                    filename,
                    dir,
                } => self.engine.save_artifact(op_id, download_url, filename, dir),
            }
        }
    }

    fn render(&mut self) {
        let view = self.state.view();
        let lines = render::changes(&self.last_view, &view, &self.base_url);
        self.print(&lines);
        if self.last_view.phase != LifecycleState::Succeeded {
            if let (Some(store), Some(entry)) =
                (&self.history, HistoryEntry::from_view(&view, Utc::now()))
            {
                store.record(entry);
            }
        }
        self.last_view = view;
    }

    fn print(&mut self, lines: &[String]) {
        for line in lines {
            if writeln!(self.out, "{line}").is_err() {
                return;
            }
        }
        let _ = self.out.flush();
    }
}

fn spawn_event_forwarder(
    events: EngineEvents,
    inbox: mpsc::Sender<SessionEvent>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("ytclip-engine-events".to_string())
        .spawn(move || {
            while let Some(event) = events.recv() {
                if inbox.send(map_event(event).into()).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::OperationCompleted { op_id, result } => {
            Msg::OperationCompleted { op_id, result }
        }
        EngineEvent::ArtifactProgress {
            op_id,
            bytes,
            total,
        } => Msg::ArtifactProgress {
            op_id,
            bytes,
            total,
        },
        EngineEvent::ArtifactCompleted { op_id, result } => Msg::ArtifactSaved {
            op_id,
            result: result.map_err(|err| err.to_string()),
        },
    }
}
