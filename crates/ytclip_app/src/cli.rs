use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use ytclip_core::{Format, Quality, DEFAULT_END_TIME, DEFAULT_START_TIME};
use ytclip_logging::{LogDestination, LogSettings};

#[derive(Debug, Parser)]
#[command(
    name = "ytclip",
    version,
    about = "Download YouTube videos or clips through a media-processing backend"
)]
pub struct Cli {
    /// Backend base URL; overrides the config file
    #[arg(long, global = true, env = "YTCLIP_BACKEND")]
    pub backend: Option<String>,

    /// Config file (default: ./ytclip.ron when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging; repeat for debug output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download a whole video
    Download {
        url: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Cut a time range out of a video
    Clip {
        url: String,
        /// Clip start, HH:MM:SS
        #[arg(long, default_value = DEFAULT_START_TIME)]
        start: String,
        /// Clip end, HH:MM:SS
        #[arg(long, default_value = DEFAULT_END_TIME)]
        end: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a link without contacting the backend
    Check { url: String },
    /// Interactive session
    Shell,
    /// List completed operations
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// mp4, mp3 or webm
    #[arg(long)]
    pub format: Option<Format>,
    /// 1080p, 720p, 480p or 360p
    #[arg(long)]
    pub quality: Option<Quality>,
    /// Copy the download link to the clipboard
    #[arg(long)]
    pub copy: bool,
    /// Fetch the produced file into this directory
    #[arg(long, value_name = "DIR")]
    pub save_to: Option<PathBuf>,
}

impl Cli {
    pub fn log_settings(&self) -> LogSettings {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        let destination = match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        };
        LogSettings { destination, level }
    }
}
