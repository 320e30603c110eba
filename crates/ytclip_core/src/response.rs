use serde::Deserialize;
use serde_json::Value;

use crate::{parse_timestamp, OperationError, TimeRange};

/// Path prefix the backend serves produced files from.
pub const ARTIFACT_ROUTE: &str = "/api/download-file/";

/// What the backend produced. Only built from a well-formed success body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub title: Option<String>,
    pub filename: String,
    pub download_url: Option<String>,
    /// Clip bounds echoed by the backend, verbatim.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl OperationResult {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Video")
    }

    /// The echoed bounds, when both are present and well formed.
    pub fn clip_range(&self) -> Option<TimeRange> {
        let start = parse_timestamp(self.start_time.as_deref()?)?;
        let end = parse_timestamp(self.end_time.as_deref()?)?;
        TimeRange::new(start, end)
    }
}

#[derive(Debug, Deserialize)]
struct SuccessBody {
    title: Option<String>,
    filename: Option<String>,
    download_url: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
}

/// Turns one backend exchange into an outcome.
///
/// Success needs a 2xx status and a non-empty `filename`. Any failure takes
/// its message from the body's `detail`, then `error`, then a fallback.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<OperationResult, OperationError> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(backend_message)
            .unwrap_or_else(|| format!("Unknown error (HTTP {status})"));
        return Err(OperationError::rejected(message));
    }

    let Some(value) = parsed else {
        return Err(OperationError::rejected("malformed response body"));
    };
    let success: SuccessBody = match serde_json::from_value(value.clone()) {
        Ok(body) => body,
        Err(_) => {
            let message =
                backend_message(&value).unwrap_or_else(|| "malformed response body".to_string());
            return Err(OperationError::rejected(message));
        }
    };

    let filename = success
        .filename
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            OperationError::rejected(
                backend_message(&value)
                    .unwrap_or_else(|| "response did not include a filename".to_string()),
            )
        })?;

    Ok(OperationResult {
        title: success.title.filter(|title| !title.is_empty()),
        filename,
        download_url: success.download_url.filter(|url| !url.is_empty()),
        start_time: success.start_time,
        end_time: success.end_time,
    })
}

fn backend_message(body: &Value) -> Option<String> {
    ["detail", "error"]
        .iter()
        .filter_map(|key| body.get(key))
        .find_map(|value| match value {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
}
