//! CSV export of locations, signalling and modem events
//!
//! Timestamps are written as `day-hh:mm:ss` keys. Packets and events are
//! joined to the fix recorded during their second; unmatched rows get empty
//! coordinates.

use nsg_format::constants::{COORDINATES_HEADER, EVENTS_HEADER, SIGNALLING_HEADER};
use nsg_format::timestamp::second_key;
use nsg_format::{Document, Location, Packet, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the per-second location export.
pub const COORDINATES_FILE: &str = "coordinates.csv";
/// File name of the packet export.
pub const SIGNALLING_FILE: &str = "signalling.csv";
/// File name of the modem event export.
pub const EVENTS_FILE: &str = "events.csv";

/// Where CSV files go
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Target directory, created if missing
    pub output_dir: PathBuf,
}

impl ExportOptions {
    /// Export next to other runs: `output/<input file stem>`.
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        Self {
            output_dir: default_output_dir(input),
        }
    }
}

/// Row counts of a finished export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Directory holding the three files
    pub output_dir: PathBuf,
    /// Rows in `coordinates.csv`
    pub coordinates: usize,
    /// Rows in `signalling.csv`
    pub signalling: usize,
    /// Rows in `events.csv`
    pub events: usize,
}

/// `output/<stem>` where the stem is the file name up to its first dot.
pub fn default_output_dir(input: impl AsRef<Path>) -> PathBuf {
    let stem = input
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "dump".to_string());
    Path::new("output").join(stem)
}

/// Write `coordinates.csv`, `signalling.csv` and `events.csv`.
pub fn export_csv(doc: &Document, opts: &ExportOptions) -> Result<ExportSummary> {
    fs::create_dir_all(&opts.output_dir)?;

    let coordinates = write_coordinates(doc, File::create(opts.output_dir.join(COORDINATES_FILE))?)?;
    let signalling = write_signalling(
        doc,
        &doc.packets,
        File::create(opts.output_dir.join(SIGNALLING_FILE))?,
    )?;
    let events = write_events(doc, File::create(opts.output_dir.join(EVENTS_FILE))?)?;

    tracing::info!(
        coordinates,
        signalling,
        events,
        "exported CSV files to {}",
        opts.output_dir.display()
    );
    Ok(ExportSummary {
        output_dir: opts.output_dir.clone(),
        coordinates,
        signalling,
        events,
    })
}

/// One row per located second.
pub fn write_coordinates<W: Write>(doc: &Document, output: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(COORDINATES_HEADER)?;

    let mut rows = 0;
    for (ts, location) in doc.locations.located() {
        writer.write_record([
            second_key(ts),
            optional(location.latitude),
            optional(location.longitude),
            location.accuracy.to_string(),
            location.speed.to_string(),
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// One row per packet. The `detail` column is kept for layout but left empty.
pub fn write_signalling<'a, I, W>(doc: &Document, packets: I, output: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a Packet>,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(SIGNALLING_HEADER)?;

    let mut rows = 0;
    for packet in packets {
        let (latitude, longitude) = coordinates(doc.location_at(&packet.timestamp));
        writer.write_record([
            packet.category.value().to_string(),
            packet.direction.to_string(),
            String::new(),
            second_key(&packet.timestamp),
            packet.title.clone(),
            latitude,
            longitude,
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// One row per modem event.
pub fn write_events<W: Write>(doc: &Document, output: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(EVENTS_HEADER)?;

    let mut rows = 0;
    for event in &doc.events {
        let (latitude, longitude) = coordinates(doc.location_at(&event.timestamp));
        writer.write_record([
            event.description.clone(),
            second_key(&event.timestamp),
            event.title.clone(),
            latitude,
            longitude,
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

fn coordinates(location: Option<&Location>) -> (String, String) {
    match location {
        Some(location) => (optional(location.latitude), optional(location.longitude)),
        None => (String::new(), String::new()),
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_document_str;
    use nsg_format::ParseOptions;

    fn sample() -> Document {
        let text = r#"{
            "device": "SM-G991B",
            "starttime": "2023-05-07T10:00:00",
            "endtime": "2023-05-07T10:00:03",
            "data": [
                {"Timestamp": "2023-05-07T10:00:01.200",
                 "Location": {"Latitude": 51.5, "Longitude": -0.12, "Accuracy": 3.456, "Speed": 0.5},
                 "messages": [{"Category": "LTE", "Direction": "Down", "Title": "Paging, idle",
                               "EquipmentTimestamp": "2023-05-07T10:00:01.900"}]},
                {"Timestamp": "2023-05-07T10:00:02",
                 "events": [{"Title": "Attach", "Description": "ok", "Timestamp": "2023-05-07T10:00:02"}]}
            ]
        }"#;
        read_document_str(text, &ParseOptions::default()).unwrap().0
    }

    #[test]
    fn coordinates_rows_use_second_keys() {
        let mut buf = Vec::new();
        let rows = write_coordinates(&sample(), &mut buf).unwrap();
        assert_eq!(rows, 1);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,Latitude,Longitude,Accuracy,Speed");
        assert_eq!(lines[1], "07-10:00:01,51.5,-0.12,3.46,0.5");
    }

    #[test]
    fn signalling_joins_location_and_quotes_titles() {
        let doc = sample();
        let mut buf = Vec::new();
        write_signalling(&doc, &doc.packets, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "category,direction,detail,timestamp,title,latitude,longitude"
        );
        assert_eq!(lines[1], "lte,Down,,07-10:00:01,\"Paging, idle\",51.5,-0.12");
    }

    #[test]
    fn events_without_fix_have_empty_coordinates() {
        let mut buf = Vec::new();
        write_events(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "description,timestamp,title,latitude,longitude");
        assert_eq!(lines[1], "ok,07-10:00:02,Attach,,");
    }

    #[test]
    fn default_output_dir_uses_first_stem() {
        assert_eq!(
            default_output_dir("logs/drive.2023-05-07.json"),
            Path::new("output").join("drive")
        );
        assert_eq!(default_output_dir(""), Path::new("output").join("dump"));
    }
}
