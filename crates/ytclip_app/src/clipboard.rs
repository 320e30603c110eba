use thiserror::Error;
use ytclip_logging::clip_debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Open(#[source] arboard::Error),
    #[error("could not write to clipboard: {0}")]
    Write(#[source] arboard::Error),
}

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard, opened on first use and kept for the session.
///
/// On X11 and Wayland the copied text is served by this process, so it stays
/// available only while the handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = match self.handle.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(ClipboardError::Open)?,
        };
        self.handle
            .insert(clipboard)
            .set_text(text)
            .map_err(ClipboardError::Write)?;
        clip_debug!("Wrote {} bytes to clipboard", text.len());
        Ok(())
    }
}
