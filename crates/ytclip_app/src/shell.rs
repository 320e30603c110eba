//! Line commands for the interactive session.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use ytclip_core::{Format, Mode, Msg, Quality};

use crate::session::SessionEvent;

pub fn help_lines() -> Vec<String> {
    [
        "url <link>             set the video link",
        "mode <download|clip>   choose full download or clip",
        "format <mp4|mp3|webm|default>",
        "quality <1080p|720p|480p|360p|default>",
        "start <HH:MM:SS>       clip start",
        "end <HH:MM:SS>         clip end",
        "submit                 send the request",
        "copy                   copy the download link",
        "save [dir]             fetch the produced file",
        "reset                  clear the last result",
        "status                 show the current form and outcome",
        "quit",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str, save_dir: &Path) -> Result<Option<SessionEvent>, String> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    let msg = match command.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "url" => Msg::UrlChanged(arg.to_string()),
        "mode" => Msg::ModeChanged(arg.parse::<Mode>()?),
        "format" => Msg::FormatChanged(optional::<Format>(arg)?),
        "quality" => Msg::QualityChanged(optional::<Quality>(arg)?),
        "start" => Msg::StartTimeChanged(arg.to_string()),
        "end" => Msg::EndTimeChanged(arg.to_string()),
        "submit" | "go" => Msg::SubmitClicked,
        "copy" => Msg::CopyLinkClicked,
        "save" => Msg::SaveArtifactClicked {
            dir: if arg.is_empty() {
                save_dir.to_path_buf()
            } else {
                PathBuf::from(arg)
            },
        },
        "reset" => Msg::ResetClicked,
        "status" => return Ok(Some(SessionEvent::Status)),
        "help" | "?" => return Ok(Some(SessionEvent::Help)),
        "quit" | "exit" => return Ok(Some(SessionEvent::Quit)),
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(SessionEvent::Msg(msg)))
}

fn optional<T: std::str::FromStr<Err = String>>(arg: &str) -> Result<Option<T>, String> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("default") {
        return Ok(None);
    }
    arg.parse().map(Some)
}

/// Reads stdin on its own thread, feeding parsed commands to the session.
/// End of input counts as `quit`.
pub fn spawn_stdin_reader(inbox: mpsc::Sender<SessionEvent>, save_dir: PathBuf) -> io::Result<()> {
    thread::Builder::new()
        .name("ytclip-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_line(&line, &save_dir) {
                    Ok(Some(event)) => {
                        if inbox.send(event).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
            let _ = inbox.send(SessionEvent::Quit);
        })?;
    Ok(())
}
