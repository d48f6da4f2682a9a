//! GPS fixes and the per-second location map

use crate::constants::{KEY_ACCURACY, KEY_LATITUDE, KEY_LOCATION, KEY_LONGITUDE, KEY_SPEED};
use crate::error::{NsgError, Result};
use crate::fields;
use crate::timestamp::{truncate_to_second, Timestamp};
use chrono::Duration;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A cleaned GPS fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    /// Latitude in degrees
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    /// Horizontal accuracy, two decimal places
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    /// Speed, two decimal places
    #[serde(rename = "Speed")]
    pub speed: f64,
}

impl Location {
    /// Clean a raw `Location` object: missing accuracy/speed become 0 and
    /// both are rounded to two decimal places.
    pub fn from_object(obj: &Map<String, Value>) -> Result<Self> {
        let field = |key: &str| format!("{}.{}", KEY_LOCATION, key);
        Ok(Self {
            latitude: fields::optional_f64(obj, KEY_LATITUDE, &field(KEY_LATITUDE))?,
            longitude: fields::optional_f64(obj, KEY_LONGITUDE, &field(KEY_LONGITUDE))?,
            accuracy: round2(fields::optional_f64(obj, KEY_ACCURACY, &field(KEY_ACCURACY))?.unwrap_or(0.0)),
            speed: round2(fields::optional_f64(obj, KEY_SPEED, &field(KEY_SPEED))?.unwrap_or(0.0)),
        })
    }

    /// Clean a raw `Location` value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| NsgError::schema(KEY_LOCATION, "must be an object"))?;
        Self::from_object(obj)
    }
}

/// Magnitude above which `value * 100` has no fractional part left.
const ROUND2_EXACT_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Round to two decimal places.
///
/// Values too large to carry hundredths are returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() || scaled.abs() >= ROUND2_EXACT_LIMIT {
        return value;
    }
    scaled.round() / 100.0
}

/// One slot per whole second of a capture, each holding the last fix seen
/// during that second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationMap {
    slots: BTreeMap<Timestamp, Option<Location>>,
}

impl LocationMap {
    /// Create empty slots for every second in `[start, end]`.
    pub fn new(start: &Timestamp, end: &Timestamp) -> Self {
        let mut slots = BTreeMap::new();
        let mut current = truncate_to_second(start);
        let last = truncate_to_second(end);
        while current <= last {
            slots.insert(current, None);
            current += Duration::seconds(1);
        }
        Self { slots }
    }

    /// Whether the second containing `ts` falls inside the capture.
    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.slots.contains_key(&truncate_to_second(ts))
    }

    /// Store a fix for the second containing `ts`.
    ///
    /// Returns false (and stores nothing) when the second is out of range.
    pub fn record(&mut self, ts: &Timestamp, location: Location) -> bool {
        match self.slots.get_mut(&truncate_to_second(ts)) {
            Some(slot) => {
                *slot = Some(location);
                true
            }
            None => false,
        }
    }

    /// Fix recorded for the second containing `ts`, if any.
    pub fn get(&self, ts: &Timestamp) -> Option<&Location> {
        self.slots
            .get(&truncate_to_second(ts))
            .and_then(|slot| slot.as_ref())
    }

    /// Seconds that carry a fix, in time order.
    pub fn located(&self) -> impl Iterator<Item = (&Timestamp, &Location)> {
        self.slots
            .iter()
            .filter_map(|(ts, slot)| slot.as_ref().map(|location| (ts, location)))
    }

    /// Number of seconds covered by the capture.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the capture covers no seconds.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of seconds that carry a fix.
    pub fn located_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }
}
