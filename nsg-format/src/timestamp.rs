//! ISO-8601 timestamp parsing and second-resolution keys

use crate::constants::TS_KEY_FORMAT;
use crate::error::{NsgError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

/// Timestamp type used throughout the data model.
///
/// Inputs without an offset are taken as UTC.
pub type Timestamp = DateTime<FixedOffset>;

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp, reporting failures against `field`.
pub fn parse_timestamp(field: &str, text: &str) -> Result<Timestamp> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NsgError::schema(field, "is empty"));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts);
    }
    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(text, format) {
            return Ok(ts);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err(NsgError::schema(
        field,
        format!("is not an ISO-8601 timestamp: '{}'", text),
    ))
}

/// Drop the sub-second part of a timestamp.
pub fn truncate_to_second(ts: &Timestamp) -> Timestamp {
    ts.with_nanosecond(0).unwrap_or(*ts)
}

/// Render the `day-hh:mm:ss` key used by CSV exports.
pub fn second_key(ts: &Timestamp) -> String {
    ts.format(TS_KEY_FORMAT).to_string()
}

/// Render a timestamp for NSG JSON output.
pub fn to_wire(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, false)
}

/// Serde adapter writing timestamps in [`to_wire`] form.
pub mod serde_wire {
    use super::{to_wire, Timestamp};
    use serde::Serializer;

    /// Serialize a timestamp as its wire string.
    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_wire(ts))
    }
}
