//! Turns raw access-log lines into [`Record`]s.

use crate::domain::{PatternConfig, Record, TIME_FIELD};
use chrono::{DateTime, NaiveDateTime};
use std::collections::HashMap;
use thiserror::Error;

/// Format of the time field, e.g. `2016-06-23T17:50:27.468 +0100`.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f %z";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid input: line or pattern is absent")]
    InvalidInput,

    #[error("Record has no 'localDateTime' field")]
    MissingTimestamp,

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// Parse one line against `config`.
///
/// An absent line or config is [`ParseError::InvalidInput`]. A line that does
/// not match the whole pattern yields an unmatched (empty) record.
pub fn parse_line(line: Option<&str>, config: Option<&PatternConfig>) -> Result<Record, ParseError> {
    let (Some(line), Some(config)) = (line, config) else {
        return Err(ParseError::InvalidInput);
    };

    let Some(captures) = config.regex().captures(line.trim()) else {
        return Ok(Record::unmatched());
    };

    let fields: HashMap<String, String> = config
        .field_names()
        .iter()
        .enumerate()
        .map(|(index, name)| {
            // groups that did not participate map to an empty value
            let value = captures.get(index + 1).map_or("", |m| m.as_str());
            (name.clone(), value.to_string())
        })
        .collect();

    Ok(Record::new(fields))
}

/// The record's time field normalised to UTC.
pub fn record_time(record: &Record) -> Result<NaiveDateTime, ParseError> {
    let value = record.local_date_time().ok_or(ParseError::MissingTimestamp)?;
    parse_log_time(value)
}

/// Parse a local-time-with-offset value and normalise it to UTC.
pub fn parse_log_time(value: &str) -> Result<NaiveDateTime, ParseError> {
    DateTime::parse_from_str(value.trim(), LOG_TIME_FORMAT)
        .map(|zoned| zoned.naive_utc())
        .map_err(|e| ParseError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parse the `since` query value, an ISO-8601 local date-time taken as UTC.
///
/// Seconds and fractional seconds are optional.
pub fn parse_since(value: &str) -> Result<NaiveDateTime, ParseError> {
    let value = value.trim();
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|e| ParseError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
