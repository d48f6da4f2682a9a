//! Record mapper: raw NSG JSON value to [`Document`]
//!
//! Row handling:
//! - rows without a timestamp are skipped with a warning
//! - rows whose second falls outside `[starttime, endtime]` are skipped
//! - `Location` fills the row's second in the location map
//! - `messages[]` become [`Packet`]s, `events[]` become [`ModemEvent`]s
//!
//! In strict mode the first schema error aborts the parse. Otherwise the
//! offending row or entry is dropped and counted in [`ParseStats`].

use crate::constants::{
    DEFAULT_MAX_SPAN_SECONDS, KEY_DATA, KEY_DEVICE, KEY_END, KEY_EQUIPMENT_TIMESTAMP, KEY_EVENTS,
    KEY_LOCATION, KEY_MESSAGES, KEY_START, KEY_TIMESTAMP,
};
use crate::document::{Document, ParseStats};
use crate::error::{NsgError, Result};
use crate::event::ModemEvent;
use crate::fields;
use crate::location::Location;
use crate::packet::Packet;
use crate::timestamp::{parse_timestamp, second_key, truncate_to_second};
use serde_json::{Map, Value};

/// Record mapper configuration
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Abort on the first malformed row or entry (default: true)
    pub strict: bool,
    /// Longest accepted `endtime - starttime`, in seconds
    pub max_span_seconds: i64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            max_span_seconds: DEFAULT_MAX_SPAN_SECONDS,
        }
    }
}

impl ParseOptions {
    /// Options that skip malformed rows and entries instead of failing.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }
}

/// Map a parsed NSG JSON document.
pub fn map_document(root: &Value, opts: &ParseOptions) -> Result<(Document, ParseStats)> {
    let obj = root
        .as_object()
        .ok_or_else(|| NsgError::schema("<root>", "must be an object"))?;

    let device = fields::required_str(obj, KEY_DEVICE, KEY_DEVICE)?;
    let start = parse_timestamp(KEY_START, fields::required_str(obj, KEY_START, KEY_START)?)?;
    let end = parse_timestamp(KEY_END, fields::required_str(obj, KEY_END, KEY_END)?)?;
    if end < start {
        return Err(NsgError::schema(KEY_END, "is before starttime"));
    }
    let span = (truncate_to_second(&end) - truncate_to_second(&start)).num_seconds();
    if span > opts.max_span_seconds {
        return Err(NsgError::schema(
            KEY_END,
            format!(
                "spans {} seconds after starttime (limit: {})",
                span, opts.max_span_seconds
            ),
        ));
    }

    let rows = fields::optional_array(obj, KEY_DATA, KEY_DATA)?
        .ok_or_else(|| NsgError::schema(KEY_DATA, "is required"))?;
    tracing::info!("{} log records found", rows.len());

    let mut mapper = RowMapper {
        opts,
        doc: Document::new(device, start, end),
        stats: ParseStats {
            rows: rows.len(),
            ..ParseStats::default()
        },
    };
    for (index, row) in rows.iter().enumerate() {
        mapper.map_row(index, row)?;
    }

    tracing::debug!(
        packets = mapper.doc.packets.len(),
        events = mapper.doc.events.len(),
        located_seconds = mapper.doc.locations.located_count(),
        skipped_rows = mapper.stats.skipped_rows,
        skipped_entries = mapper.stats.skipped_entries,
        "mapped NSG dump"
    );
    Ok((mapper.doc, mapper.stats))
}

struct RowMapper<'a> {
    opts: &'a ParseOptions,
    doc: Document,
    stats: ParseStats,
}

impl RowMapper<'_> {
    fn map_row(&mut self, index: usize, row: &Value) -> Result<()> {
        let Some(obj) = row.as_object() else {
            let err = NsgError::schema(format!("{}[{}]", KEY_DATA, index), "must be an object");
            return self.reject_row(err);
        };

        let ts_value = obj
            .get(KEY_TIMESTAMP)
            .or_else(|| obj.get(KEY_EQUIPMENT_TIMESTAMP));
        let ts_text = match ts_value {
            Some(Value::String(text)) if !text.trim().is_empty() => text,
            None | Some(Value::Null) | Some(Value::String(_)) => {
                tracing::warn!("No timestamp found in row {}: {}", index, row);
                self.stats.skipped_rows += 1;
                return Ok(());
            }
            Some(_) => {
                let err = NsgError::schema(KEY_TIMESTAMP, "must be a string");
                return self.reject_row(locate(err, index, None));
            }
        };
        let ts = match parse_timestamp(KEY_TIMESTAMP, ts_text) {
            Ok(ts) => ts,
            Err(err) => return self.reject_row(locate(err, index, None)),
        };

        if !self.doc.locations.contains(&ts) {
            tracing::warn!("timestamp outside range of testing: {}", second_key(&ts));
            self.stats.skipped_rows += 1;
            return Ok(());
        }

        if let Some(raw) = obj.get(KEY_LOCATION).filter(|value| !value.is_null()) {
            match Location::from_value(raw) {
                Ok(location) => {
                    self.doc.locations.record(&ts, location);
                }
                Err(err) => self.reject_entry(locate(err, index, None))?,
            }
        }

        for (entry, item) in self.entries(obj, index, KEY_MESSAGES)?.iter().enumerate() {
            match Packet::from_value(item) {
                Ok(packet) => self.doc.packets.push(packet),
                Err(err) => self.reject_entry(locate(err, index, Some(entry)))?,
            }
        }

        for (entry, item) in self.entries(obj, index, KEY_EVENTS)?.iter().enumerate() {
            match ModemEvent::from_value(item) {
                Ok(event) => self.doc.events.push(event),
                Err(err) => self.reject_entry(locate(err, index, Some(entry)))?,
            }
        }

        Ok(())
    }

    /// Items of an optional array key; a non-array value is a rejected entry.
    fn entries<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        index: usize,
        key: &str,
    ) -> Result<&'v [Value]> {
        match fields::optional_array(obj, key, key) {
            Ok(items) => Ok(items.map(Vec::as_slice).unwrap_or_default()),
            Err(err) => {
                self.reject_entry(locate(err, index, None))?;
                Ok(&[])
            }
        }
    }

    fn reject_row(&mut self, err: NsgError) -> Result<()> {
        if self.opts.strict {
            return Err(err);
        }
        tracing::warn!("Skipping row: {}", err);
        self.stats.skipped_rows += 1;
        Ok(())
    }

    fn reject_entry(&mut self, err: NsgError) -> Result<()> {
        if self.opts.strict {
            return Err(err);
        }
        tracing::warn!("Skipping entry: {}", err);
        self.stats.skipped_entries += 1;
        Ok(())
    }
}

/// Prefix schema errors with the row (and entry) they came from.
fn locate(err: NsgError, row: usize, entry: Option<usize>) -> NsgError {
    match err {
        NsgError::Schema { field, reason } => {
            let field = match entry {
                Some(entry) => field.replacen("[]", &format!("[{}]", entry), 1),
                None => field,
            };
            NsgError::Schema {
                field: format!("{}[{}].{}", KEY_DATA, row, field),
                reason,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Direction};
    use serde_json::json;

    fn dump(data: Value) -> Value {
        json!({
            "device": "SM-G991B",
            "starttime": "2023-05-01T10:00:00",
            "endtime": "2023-05-01T10:00:05",
            "data": data
        })
    }

    #[test]
    fn maps_rows_into_packets_events_and_locations() {
        let root = dump(json!([
            {
                "Timestamp": "2023-05-01T10:00:01.250",
                "Location": {"Latitude": 51.5, "Longitude": -0.12, "Accuracy": 4.567, "Speed": 1.0},
                "messages": [
                    {"Category": "LTE", "Direction": "Down", "Frequency": 497,
                     "Title": "RRC Connection Setup", "EquipmentTimestamp": "2023-05-01T10:00:01.250"}
                ]
            },
            {
                "Timestamp": "2023-05-01T10:00:02",
                "events": [{"Title": "Attach", "Timestamp": "2023-05-01T10:00:02"}]
            }
        ]));

        let (doc, stats) = map_document(&root, &ParseOptions::default()).unwrap();
        assert_eq!(doc.device, "SM-G991B");
        assert_eq!(doc.packets.len(), 1);
        assert_eq!(doc.packets[0].category, Category::Lte);
        assert_eq!(doc.packets[0].direction, Direction::Down);
        assert_eq!(doc.events.len(), 1);
        assert_eq!(doc.locations.located_count(), 1);
        let fix = doc.location_at(&doc.packets[0].timestamp).unwrap();
        assert_eq!(fix.accuracy, 4.57);
        assert_eq!(stats, ParseStats { rows: 2, skipped_rows: 0, skipped_entries: 0 });
    }

    #[test]
    fn skips_rows_without_timestamp_or_out_of_range() {
        let root = dump(json!([
            {"messages": [{"Direction": "Up", "Timestamp": "2023-05-01T10:00:01"}]},
            {"Timestamp": "", "messages": []},
            {"Timestamp": "2023-05-01T11:00:00", "messages": [{"Direction": "Up", "Timestamp": "2023-05-01T11:00:00"}]},
            {"EquipmentTimestamp": "2023-05-01T10:00:05.900", "messages": [{"Direction": "Up", "Timestamp": "2023-05-01T10:00:05"}]}
        ]));

        let (doc, stats) = map_document(&root, &ParseOptions::default()).unwrap();
        assert_eq!(doc.packets.len(), 1);
        assert_eq!(stats.skipped_rows, 3);
    }

    #[test]
    fn strict_mode_reports_entry_position() {
        let root = dump(json!([
            {"Timestamp": "2023-05-01T10:00:01", "messages": [{"Direction": "Up", "Timestamp": "2023-05-01T10:00:01"}]},
            {"Timestamp": "2023-05-01T10:00:02", "messages": [
                {"Direction": "Up", "Timestamp": "2023-05-01T10:00:02"},
                {"Category": "LTE", "Timestamp": "2023-05-01T10:00:02"}
            ]}
        ]));

        match map_document(&root, &ParseOptions::default()) {
            Err(NsgError::Schema { field, reason }) => {
                assert_eq!(field, "data[1].messages[1].Direction");
                assert_eq!(reason, "is required");
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn lenient_mode_skips_bad_entries() {
        let root = dump(json!([
            {"Timestamp": "2023-05-01T10:00:02", "messages": [
                {"Direction": "Up", "Timestamp": "2023-05-01T10:00:02"},
                {"Category": "LTE", "Timestamp": "2023-05-01T10:00:02"}
            ], "events": "not-a-list", "Location": {"Latitude": "x"}},
            {"Timestamp": "not a time"},
            "garbage"
        ]));

        let (doc, stats) = map_document(&root, &ParseOptions::lenient()).unwrap();
        assert_eq!(doc.packets.len(), 1);
        assert!(doc.events.is_empty());
        assert_eq!(doc.locations.located_count(), 0);
        assert_eq!(stats.skipped_entries, 3);
        assert_eq!(stats.skipped_rows, 2);
    }

    #[test]
    fn rejects_missing_top_level_keys() {
        let cases = [
            (json!({"starttime": "2023-05-01T10:00:00", "endtime": "2023-05-01T10:00:01", "data": []}), "device"),
            (json!({"device": "d", "endtime": "2023-05-01T10:00:01", "data": []}), "starttime"),
            (json!({"device": "d", "starttime": "2023-05-01T10:00:00", "endtime": "2023-05-01T10:00:01"}), "data"),
        ];
        for (root, expected) in cases {
            match map_document(&root, &ParseOptions::default()) {
                Err(NsgError::Schema { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected schema error for {}, got {:?}", expected, other),
            }
        }
        assert!(map_document(&json!([]), &ParseOptions::default()).is_err());
    }

    #[test]
    fn rejects_inverted_and_oversized_spans() {
        let inverted = json!({
            "device": "d", "starttime": "2023-05-01T10:00:05", "endtime": "2023-05-01T10:00:00", "data": []
        });
        assert!(map_document(&inverted, &ParseOptions::default()).is_err());

        let long = json!({
            "device": "d", "starttime": "2023-05-01T00:00:00", "endtime": "2023-05-01T01:00:00", "data": []
        });
        let opts = ParseOptions {
            max_span_seconds: 60,
            ..ParseOptions::default()
        };
        let err = map_document(&long, &opts).unwrap_err();
        assert!(err.to_string().contains("limit: 60"));
    }
}
