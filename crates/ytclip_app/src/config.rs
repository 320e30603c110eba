//! On-disk settings, stored as RON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ytclip_core::{Format, Quality};
use ytclip_engine::BackendSettings;
use ytclip_logging::clip_info;

pub const DEFAULT_CONFIG_FILE: &str = "ytclip.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field} in config: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// `mp4`, `mp3` or `webm`.
    pub default_format: Option<String>,
    /// `1080p`, `720p`, `480p` or `360p`.
    pub default_quality: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub history_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 600,
            default_format: None,
            default_quality: None,
            download_dir: None,
            history_file: PathBuf::from(".ytclip_history.ron"),
        }
    }
}

impl AppConfig {
    /// Reads `explicit`, or `ytclip.ron` in the working directory.
    ///
    /// Only the implicit default file may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let config = Self::parse(&text).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        config.default_format()?;
        config.default_quality()?;
        clip_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    pub fn default_format(&self) -> Result<Option<Format>, ConfigError> {
        self.default_format
            .as_deref()
            .map(|text| text.parse())
            .transpose()
            .map_err(|message| ConfigError::Invalid {
                field: "default_format",
                message,
            })
    }

    pub fn default_quality(&self) -> Result<Option<Quality>, ConfigError> {
        self.default_quality
            .as_deref()
            .map(|text| text.parse())
            .transpose()
            .map_err(|message| ConfigError::Invalid {
                field: "default_quality",
                message,
            })
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..BackendSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"(backend_url: "http://media.lan:9000", default_format: Some("mp3"))"#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://media.lan:9000");
        assert_eq!(config.default_format().unwrap(), Some(Format::Mp3));
        assert_eq!(config.request_timeout_secs, 600);
        assert_eq!(config.history_file, PathBuf::from(".ytclip_history.ron"));
    }

    #[test]
    fn bad_quality_is_reported() {
        let config = AppConfig::parse(r#"(default_quality: Some("4k"))"#).unwrap();
        assert!(matches!(
            config.default_quality(),
            Err(ConfigError::Invalid {
                field: "default_quality",
                ..
            })
        ));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("nope.ron");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ytclip.ron");
        fs::write(&path, r#"(request_timeout_secs: 30, download_dir: Some("out"))"#).unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.backend_settings().request_timeout, Duration::from_secs(30));
        assert_eq!(config.download_dir, Some(PathBuf::from("out")));
    }
}
