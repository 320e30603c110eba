use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use ytclip_core::{Msg, PendingReset};

use crate::session::SessionEvent;

/// Delivers `Msg::CopiedResetElapsed` once a scheduled reset comes due.
///
/// Holds one pending reset at a time; scheduling replaces whatever was waiting.
pub struct ResetTimer {
    tx: mpsc::Sender<PendingReset>,
}

impl ResetTimer {
    pub fn spawn(inbox: mpsc::Sender<SessionEvent>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<PendingReset>();
        thread::Builder::new()
            .name("ytclip-copied-reset".to_string())
            .spawn(move || run(rx, inbox))?;
        Ok(Self { tx })
    }

    pub fn schedule(&self, reset: PendingReset) {
        let _ = self.tx.send(reset);
    }
}

fn run(rx: mpsc::Receiver<PendingReset>, inbox: mpsc::Sender<SessionEvent>) {
    let mut pending: Option<(Instant, u64)> = None;
    loop {
        let incoming = match pending {
            Some((deadline, _)) => {
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match incoming {
            Ok(reset) => pending = Some((Instant::now() + reset.after, reset.generation)),
            Err(RecvTimeoutError::Timeout) => {
                if let Some((_, generation)) = pending.take() {
                    let msg = Msg::CopiedResetElapsed { generation };
                    if inbox.send(SessionEvent::Msg(msg)).is_err() {
                        return;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}
