//! Layer-3 signalling packets

use crate::constants::{
    KEY_CATEGORY, KEY_DETAIL, KEY_DIRECTION, KEY_EQUIPMENT_TIMESTAMP, KEY_FREQUENCY, KEY_PCAP,
    KEY_TIMESTAMP, KEY_TITLE,
};
use crate::error::{NsgError, Result};
use crate::fields;
use crate::timestamp::{parse_timestamp, Timestamp};
use crate::types::{Category, Direction};
use serde::Serialize;
use serde_json::{Map, Value};

const FIELD_PREFIX: &str = "messages[].";

/// One captured layer-3 message
///
/// Serializes back to the same keys it was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Packet {
    /// Technology / protocol layer
    #[serde(rename = "Category")]
    pub category: Category,
    /// Uplink or downlink
    #[serde(rename = "Direction")]
    pub direction: Direction,
    /// Channel number (ARFCN/UARFCN/EARFCN), when the logger recorded one
    #[serde(rename = "Frequency", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Message name, e.g. `RRC Connection Setup`
    #[serde(rename = "Title")]
    pub title: String,
    /// Equipment timestamp, falling back to the message timestamp
    #[serde(rename = "EquipmentTimestamp", with = "crate::timestamp::serde_wire")]
    pub timestamp: Timestamp,
    /// Decoded message tree, kept as-is
    #[serde(rename = "Detail")]
    pub detail: Map<String, Value>,
    /// Raw packet as exported by the logger
    #[serde(rename = "PCAPPacket")]
    pub pcap: String,
}

impl Packet {
    /// Map one raw `messages[]` entry to a packet.
    ///
    /// `Direction` and a timestamp are required; everything else defaults.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| NsgError::schema("messages[]", "must be an object"))?;

        let field = |key: &str| format!("{}{}", FIELD_PREFIX, key);

        let category = match fields::optional_str(obj, KEY_CATEGORY, &field(KEY_CATEGORY))? {
            Some(name) => Category::from_name(name).ok_or_else(|| {
                NsgError::schema(field(KEY_CATEGORY), format!("has unknown value '{}'", name))
            })?,
            None => Category::Unknown,
        };

        let direction_name =
            fields::required_str(obj, KEY_DIRECTION, &field(KEY_DIRECTION))?;
        let direction = Direction::from_name(direction_name).ok_or_else(|| {
            NsgError::schema(
                field(KEY_DIRECTION),
                format!("has unknown value '{}'", direction_name),
            )
        })?;

        let (ts_text, ts_field) =
            fields::first_str(obj, &[KEY_EQUIPMENT_TIMESTAMP, KEY_TIMESTAMP], FIELD_PREFIX)?
                .ok_or_else(|| NsgError::schema(field(KEY_EQUIPMENT_TIMESTAMP), "is required"))?;
        let timestamp = parse_timestamp(&ts_field, ts_text)?;

        Ok(Self {
            category,
            direction,
            frequency: fields::optional_channel(obj, KEY_FREQUENCY, &field(KEY_FREQUENCY))?,
            title: fields::optional_str(obj, KEY_TITLE, &field(KEY_TITLE))?
                .unwrap_or_default()
                .to_string(),
            timestamp,
            detail: fields::optional_object(obj, KEY_DETAIL, &field(KEY_DETAIL))?
                .cloned()
                .unwrap_or_default(),
            pcap: fields::optional_str(obj, KEY_PCAP, &field(KEY_PCAP))?
                .unwrap_or_default()
                .to_string(),
        })
    }
}
