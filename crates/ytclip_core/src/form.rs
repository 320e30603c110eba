use crate::{
    build_request, validate_time_range, validate_url, DownloadRequest, Format, Mode,
    OperationError, Quality, Selection,
};

pub const DEFAULT_START_TIME: &str = "00:00:00";
pub const DEFAULT_END_TIME: &str = "00:01:00";

/// Editable inputs of the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub url: String,
    pub mode: Mode,
    pub format: Option<Format>,
    pub quality: Option<Quality>,
    pub start_time: String,
    pub end_time: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            url: String::new(),
            mode: Mode::Download,
            format: None,
            quality: None,
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
        }
    }
}

impl FormState {
    /// Runs the validators and captures the request. The time fields are
    /// only looked at in clip mode.
    pub fn to_request(&self) -> Result<DownloadRequest, OperationError> {
        let url = validate_url(&self.url)?;
        let selection = match self.mode {
            Mode::Download => Selection::Download,
            Mode::Clip => Selection::Clip(validate_time_range(&self.start_time, &self.end_time)?),
        };
        Ok(build_request(&url, selection, self.format, self.quality))
    }
}
