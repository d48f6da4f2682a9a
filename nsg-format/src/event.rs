//! Modem events (attach, handover, RLF, ...)

use crate::constants::{KEY_DESCRIPTION, KEY_EQUIPMENT_TIMESTAMP, KEY_TIMESTAMP, KEY_TITLE};
use crate::error::{NsgError, Result};
use crate::fields;
use crate::timestamp::{parse_timestamp, Timestamp};
use serde::Serialize;
use serde_json::Value;

const FIELD_PREFIX: &str = "events[].";

/// A modem-reported event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModemEvent {
    /// Event name
    #[serde(rename = "Title")]
    pub title: String,
    /// Free-form description
    #[serde(rename = "Description")]
    pub description: String,
    /// Event timestamp, falling back to the equipment timestamp
    #[serde(rename = "Timestamp", with = "crate::timestamp::serde_wire")]
    pub timestamp: Timestamp,
}

impl ModemEvent {
    /// Map one raw `events[]` entry. Only the timestamp is required.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| NsgError::schema("events[]", "must be an object"))?;

        let (ts_text, ts_field) =
            fields::first_str(obj, &[KEY_TIMESTAMP, KEY_EQUIPMENT_TIMESTAMP], FIELD_PREFIX)?
                .ok_or_else(|| {
                    NsgError::schema(format!("{}{}", FIELD_PREFIX, KEY_TIMESTAMP), "is required")
                })?;

        Ok(Self {
            title: fields::optional_str(obj, KEY_TITLE, &format!("{}{}", FIELD_PREFIX, KEY_TITLE))?
                .unwrap_or_default()
                .to_string(),
            description: fields::optional_str(
                obj,
                KEY_DESCRIPTION,
                &format!("{}{}", FIELD_PREFIX, KEY_DESCRIPTION),
            )?
            .unwrap_or_default()
            .to_string(),
            timestamp: parse_timestamp(&ts_field, ts_text)?,
        })
    }
}
