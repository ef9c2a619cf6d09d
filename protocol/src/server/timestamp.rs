use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Epoch values below this are taken as seconds, above as milliseconds.
const EPOCH_SECONDS_LIMIT: f64 = 1e11;

/// Accepted date strings without an offset, read as local time
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Message timestamp as sent by the server: an epoch number or a date string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Epoch(f64),
    Text(String),
}

impl Timestamp {
    /// Convert to local time, if the value can be interpreted
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Self::Epoch(value) => {
                let millis = if value.abs() < EPOCH_SECONDS_LIMIT {
                    value * 1000.0
                } else {
                    *value
                };
                DateTime::<Utc>::from_timestamp_millis(millis as i64)
                    .map(|utc| utc.with_timezone(&Local))
            }
            Self::Text(text) => parse_text(text.trim()),
        }
    }

    /// Best-effort HH:MM cut from the raw text, for values `to_local` rejects
    pub fn raw_clock(&self) -> String {
        match self {
            Self::Epoch(_) => String::new(),
            Self::Text(text) => {
                let time = text.split_once('T').map(|(_, time)| time).unwrap_or(text);
                time.chars().take(5).collect()
            }
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Local>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Local));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}
