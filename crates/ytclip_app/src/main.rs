mod cli;
mod clipboard;
mod config;
mod history;
mod render;
mod session;
mod shell;
mod timer;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use ytclip_core::{validate_url, ArtifactState, ErrorKind, Mode, Msg};
use ytclip_engine::EngineHandle;
use ytclip_logging::{clip_error, clip_info};

use crate::cli::{Cli, Command, OutputArgs};
use crate::clipboard::SystemClipboard;
use crate::config::AppConfig;
use crate::history::HistoryStore;
use crate::session::Session;

const EXIT_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    ytclip_logging::initialize(&cli.log_settings());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            clip_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }
    clip_info!("Using backend {}", config.backend_url);

    match cli.command {
        Command::Check { url } => Ok(check(&url)),
        Command::History { limit } => {
            print_history(&HistoryStore::new(config.history_file.clone()), limit);
            Ok(ExitCode::SUCCESS)
        }
        Command::Download { url, output } => run_once(&config, url, None, output),
        Command::Clip {
            url,
            start,
            end,
            output,
        } => run_once(&config, url, Some((start, end)), output),
        Command::Shell => run_shell(&config),
    }
}

fn start_session(config: &AppConfig) -> anyhow::Result<Session> {
    let (engine, events) =
        EngineHandle::new(config.backend_settings()).context("failed to start engine")?;
    let session = Session::new(
        engine,
        events,
        config.backend_url.clone(),
        Box::new(SystemClipboard::default()),
        Some(HistoryStore::new(config.history_file.clone())),
        Box::new(io::stdout()),
    )
    .context("failed to start session")?;
    Ok(session)
}

/// One submission from the command line; `range` selects clip mode.
fn run_once(
    config: &AppConfig,
    url: String,
    range: Option<(String, String)>,
    output: OutputArgs,
) -> anyhow::Result<ExitCode> {
    let format = output.format.or(config.default_format()?);
    let quality = output.quality.or(config.default_quality()?);
    let mut session = start_session(config)?;

    session.dispatch(Msg::UrlChanged(url));
    match range {
        Some((start, end)) => {
            session.dispatch(Msg::ModeChanged(Mode::Clip));
            session.dispatch(Msg::StartTimeChanged(start));
            session.dispatch(Msg::EndTimeChanged(end));
        }
        None => session.dispatch(Msg::ModeChanged(Mode::Download)),
    }
    session.dispatch(Msg::FormatChanged(format));
    session.dispatch(Msg::QualityChanged(quality));
    session.dispatch(Msg::SubmitClicked);

    let view = session.run_until(|view| view.phase.is_terminal());
    if let Some(err) = &view.error {
        return Ok(match err.cause {
            ErrorKind::InvalidUrl | ErrorKind::InvalidTimeRange => ExitCode::from(EXIT_USAGE),
            _ => ExitCode::from(EXIT_FAILED),
        });
    }

    if output.copy {
        if view.can_copy {
            session.dispatch(Msg::CopyLinkClicked);
            session.drain();
            if session.view().copied {
                // X11 and Wayland serve the text from this process; hold it
                // until the confirmation clears.
                session.run_until(|view| !view.copied);
            } else {
                eprintln!("Could not copy the link to the clipboard");
            }
        } else {
            eprintln!("The backend did not return a download link to copy");
        }
    }

    if let Some(dir) = output.save_to {
        session.dispatch(Msg::SaveArtifactClicked { dir });
        let view = session.run_until(|view| !matches!(view.artifact, ArtifactState::Saving { .. }));
        if matches!(view.artifact, ArtifactState::Failed(_)) {
            return Ok(ExitCode::from(EXIT_FAILED));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_shell(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let format = config.default_format()?;
    let quality = config.default_quality()?;
    let mut session = start_session(config)?;
    if format.is_some() {
        session.dispatch(Msg::FormatChanged(format));
    }
    if quality.is_some() {
        session.dispatch(Msg::QualityChanged(quality));
    }

    let save_dir = config
        .download_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    shell::spawn_stdin_reader(session.sender(), save_dir).context("failed to read stdin")?;
    session.run_interactive();
    Ok(ExitCode::SUCCESS)
}

fn check(url: &str) -> ExitCode {
    match validate_url(url) {
        Ok(normalized) => {
            let id = normalized.video_id();
            println!("OK        {}", normalized.as_str());
            println!("Video id  {}", id.as_str());
            println!("Watch     {}", id.watch_url());
            println!("Thumbnail {}", id.thumbnail_url());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Invalid link: {err}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn print_history(store: &HistoryStore, limit: usize) {
    let entries = store.load();
    if entries.is_empty() {
        println!("No completed operations in {}", store.path().display());
        return;
    }
    for entry in entries.iter().rev().take(limit) {
        let title = entry.title.as_deref().unwrap_or("Video");
        match &entry.clip {
            Some(clip) => println!(
                "{}  {:<8}  {}  [{}]  {}",
                entry.completed_at, entry.mode, title, clip, entry.filename
            ),
            None => println!(
                "{}  {:<8}  {}  {}",
                entry.completed_at, entry.mode, title, entry.filename
            ),
        }
    }
}
