use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{NormalizedUrl, TimeRange};

/// Which backend operation the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Download,
    Clip,
}

impl Mode {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Mode::Download => Endpoint::Download,
            Mode::Clip => Endpoint::Clip,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Download => write!(f, "download"),
            Mode::Clip => write!(f, "clip"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" | "full" => Ok(Mode::Download),
            "clip" => Ok(Mode::Clip),
            other => Err(format!("unknown mode {other:?} (expected download or clip)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Mp4,
    Mp3,
    Webm,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Mp4 => "mp4",
            Format::Mp3 => "mp3",
            Format::Webm => "webm",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Format::Mp4),
            "mp3" => Ok(Format::Mp3),
            "webm" => Ok(Format::Webm),
            other => Err(format!("unknown format {other:?} (expected mp4, mp3 or webm)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::P360 => "360p",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let digits = lowered.strip_suffix('p').unwrap_or(&lowered);
        match digits {
            "1080" => Ok(Quality::P1080),
            "720" => Ok(Quality::P720),
            "480" => Ok(Quality::P480),
            "360" => Ok(Quality::P360),
            _ => Err(format!(
                "unknown quality {s:?} (expected 1080p, 720p, 480p or 360p)"
            )),
        }
    }
}

/// Backend route an operation is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Download,
    Clip,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Download => "/api/download",
            Endpoint::Clip => "/api/clip",
        }
    }
}

/// The operation together with the data only that operation carries, so a
/// clip range exists exactly when the mode is [`Mode::Clip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Download,
    Clip(TimeRange),
}

impl Selection {
    pub fn mode(&self) -> Mode {
        match self {
            Selection::Download => Mode::Download,
            Selection::Clip(_) => Mode::Clip,
        }
    }
}

/// A fully validated request, captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    source_url: String,
    selection: Selection,
    format: Option<Format>,
    quality: Option<Quality>,
}

impl DownloadRequest {
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn mode(&self) -> Mode {
        self.selection.mode()
    }

    pub fn format(&self) -> Option<Format> {
        self.format
    }

    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }

    pub fn clip_range(&self) -> Option<TimeRange> {
        match self.selection {
            Selection::Download => None,
            Selection::Clip(range) => Some(range),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.mode().endpoint()
    }

    /// Wire shape expected by the backend.
    pub fn body(&self) -> RequestBody {
        let range = self.clip_range();
        RequestBody {
            video_url: self.source_url.clone(),
            start_time: range.map(|r| r.start_text()),
            end_time: range.map(|r| r.end_text()),
            format: self.format,
            quality: self.quality,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.body())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBody {
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

/// Assembles a request from already validated parts. Pure; no I/O.
pub fn build_request(
    url: &NormalizedUrl,
    selection: Selection,
    format: Option<Format>,
    quality: Option<Quality>,
) -> DownloadRequest {
    DownloadRequest {
        source_url: url.as_str().to_string(),
        selection,
        format,
        quality,
    }
}
