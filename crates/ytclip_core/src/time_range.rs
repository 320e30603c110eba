use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::{ErrorKind, OperationError};

/// Which end of the clip a timestamp belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Start => write!(f, "start time"),
            RangeBound::End => write!(f, "end time"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    #[error("{0} is required")]
    Missing(RangeBound),
    #[error("{bound} {value:?} is not in HH:MM:SS form")]
    Malformed { bound: RangeBound, value: String },
    #[error("start time {start} must be before end time {end}")]
    NotIncreasing { start: String, end: String },
}

impl From<TimeRangeError> for OperationError {
    fn from(err: TimeRangeError) -> Self {
        OperationError::new(ErrorKind::InvalidTimeRange, err.to_string())
    }
}

/// Inclusive clip bounds with second resolution. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: Duration,
    end: Duration,
}

impl TimeRange {
    pub fn new(start: Duration, end: Duration) -> Option<Self> {
        let start = Duration::from_secs(start.as_secs());
        let end = Duration::from_secs(end.as_secs());
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> Duration {
        self.start
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    pub fn start_text(&self) -> String {
        format_timestamp(self.start)
    }

    pub fn end_text(&self) -> String {
        format_timestamp(self.end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_text(), self.end_text())
    }
}

/// Parses `HH:MM:SS`. Hours take any number of digits; minutes and seconds
/// are exactly two digits in `00..=59`.
pub fn parse_timestamp(text: &str) -> Option<Duration> {
    let mut parts = text.trim().split(':');
    let (hours, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours = digits(hours)?;
    let minutes = two_digit_field(minutes)?;
    let seconds = two_digit_field(seconds)?;

    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    Some(Duration::from_secs(total))
}

/// Canonical `HH:MM:SS` text; hours widen past two digits when needed.
pub fn format_timestamp(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Validates the clip bounds typed by the user.
pub fn validate_time_range(start: &str, end: &str) -> Result<TimeRange, TimeRangeError> {
    let start_at = parse_bound(RangeBound::Start, start)?;
    let end_at = parse_bound(RangeBound::End, end)?;

    TimeRange::new(start_at, end_at).ok_or_else(|| TimeRangeError::NotIncreasing {
        start: format_timestamp(start_at),
        end: format_timestamp(end_at),
    })
}

fn parse_bound(bound: RangeBound, text: &str) -> Result<Duration, TimeRangeError> {
    if text.trim().is_empty() {
        return Err(TimeRangeError::Missing(bound));
    }
    parse_timestamp(text).ok_or_else(|| TimeRangeError::Malformed {
        bound,
        value: text.trim().to_string(),
    })
}

fn digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn two_digit_field(field: &str) -> Option<u64> {
    if field.len() != 2 {
        return None;
    }
    digits(field).filter(|value| *value < 60)
}
