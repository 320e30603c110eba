use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ytclip_core::{AppViewModel, LifecycleState};
use ytclip_engine::{ensure_output_dir, ArtifactWriter};
use ytclip_logging::{clip_error, clip_info, clip_warn};

/// Oldest entries are dropped beyond this.
const MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// RFC 3339, UTC.
    pub completed_at: String,
    pub mode: String,
    pub source_url: String,
    pub title: Option<String>,
    pub filename: String,
    pub download_url: Option<String>,
    pub clip: Option<String>,
}

impl HistoryEntry {
    /// Builds an entry from a succeeded view; `None` for any other phase.
    pub fn from_view(view: &AppViewModel, completed_at: DateTime<Utc>) -> Option<Self> {
        if view.phase != LifecycleState::Succeeded {
            return None;
        }
        let result = view.result.as_ref()?;
        let submitted = view.submitted.as_ref()?;
        Some(Self {
            completed_at: completed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            mode: submitted.mode.to_string(),
            source_url: submitted.source_url.clone(),
            title: result.title.clone(),
            filename: result.filename.clone(),
            download_url: result.download_url.clone(),
            clip: submitted.clip_range.map(|range| range.to_string()),
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    entries: Vec<HistoryEntry>,
}

/// Completed operations, newest last, kept in a RON file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unreadable or malformed files are logged and treated as empty.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                clip_warn!("Failed to read history from {:?}: {}", self.path, err);
                return Vec::new();
            }
        };

        match ron::from_str::<HistoryFile>(&content) {
            Ok(file) => file.entries,
            Err(err) => {
                clip_warn!("Failed to parse history from {:?}: {}", self.path, err);
                Vec::new()
            }
        }
    }

    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.load();
        entries.push(entry);
        let excess = entries.len().saturating_sub(MAX_ENTRIES);
        entries.drain(..excess);
        self.save(entries);
    }

    fn save(&self, entries: Vec<HistoryEntry>) {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            clip_error!("History path {:?} has no usable file name", self.path);
            return;
        };
        if let Err(err) = ensure_output_dir(&dir) {
            clip_error!("Failed to prepare history dir {:?}: {}", dir, err);
            return;
        }

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&HistoryFile { entries }, pretty) {
            Ok(text) => text,
            Err(err) => {
                clip_error!("Failed to serialize history: {}", err);
                return;
            }
        };

        match ArtifactWriter::new(dir).write(name, content.as_bytes()) {
            Ok(_) => clip_info!("History written to {:?}", self.path),
            Err(err) => clip_error!("Failed to write history to {:?}: {}", self.path, err),
        }
    }
}
