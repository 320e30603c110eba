use std::fmt;

use thiserror::Error;
use url::Url;

use crate::{ErrorKind, OperationError};

/// Length of every YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// An 11 character identifier drawn from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn parse(candidate: &str) -> Option<Self> {
        let well_formed = candidate.len() == VIDEO_ID_LEN
            && candidate
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        well_formed.then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/hqdefault.jpg", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pasted link that passed validation.
///
/// The URL is kept as the user typed it (trimmed, scheme added when missing);
/// the backend receives this form, not a canonical rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    url: String,
    video_id: VideoId,
}

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn into_string(self) -> String {
        self.url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("please provide a YouTube URL")]
    Empty,
    #[error("not a valid URL: {0}")]
    Malformed(String),
    #[error("not a recognized YouTube link")]
    UnrecognizedLink,
    #[error("{0:?} is not a valid video id")]
    InvalidVideoId(String),
}

impl From<UrlError> for OperationError {
    fn from(err: UrlError) -> Self {
        OperationError::new(ErrorKind::InvalidUrl, err.to_string())
    }
}

/// Checks a pasted link and extracts its video id.
///
/// Accepts `youtube.com/watch?v=ID`, `/embed/ID`, `/shorts/ID` and
/// `youtu.be/ID`. Never panics; runs on every edit of the input field.
pub fn validate_url(raw: &str) -> Result<NormalizedUrl, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&url).map_err(|err| UrlError::Malformed(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::UnrecognizedLink);
    }

    let host = parsed.host_str().ok_or(UrlError::UnrecognizedLink)?;
    let candidate = match classify_host(host) {
        Some(LinkShape::Short) => first_segment(&parsed),
        Some(LinkShape::Long) => long_form_candidate(&parsed),
        None => None,
    }
    .ok_or(UrlError::UnrecognizedLink)?;

    let video_id =
        VideoId::parse(&candidate).ok_or_else(|| UrlError::InvalidVideoId(candidate.clone()))?;
    Ok(NormalizedUrl { url, video_id })
}

/// A `://` only marks a scheme when nothing path-like comes before it; a link
/// can carry another URL in its query string.
fn has_scheme(text: &str) -> bool {
    text.find("://").is_some_and(|at| {
        !text[..at].contains(|c: char| matches!(c, '/' | '?' | '#'))
    })
}

enum LinkShape {
    Long,
    Short,
}

fn classify_host(host: &str) -> Option<LinkShape> {
    let host = host.to_ascii_lowercase();
    let bare = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("music."))
        .unwrap_or(&host);
    match bare {
        "youtube.com" => Some(LinkShape::Long),
        "youtu.be" => Some(LinkShape::Short),
        _ => None,
    }
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(ToOwned::to_owned)
}

fn long_form_candidate(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    match segments.next()? {
        "watch" => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        "embed" | "shorts" => segments
            .next()
            .filter(|segment| !segment.is_empty())
            .map(ToOwned::to_owned),
        _ => None,
    }
}
