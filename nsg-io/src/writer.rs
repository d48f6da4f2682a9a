//! JSON dump writer
//!
//! Re-emits the NSG layout so that the output can be loaded again: one row
//! per located second, then one row per packet and one per event. Entry rows
//! are stamped with the entry's own time, clamped into the capture range so
//! that no entry is dropped on reload.

use nsg_format::constants::{
    KEY_DATA, KEY_DEVICE, KEY_END, KEY_EVENTS, KEY_LOCATION, KEY_MESSAGES, KEY_START,
    KEY_TIMESTAMP,
};
use nsg_format::timestamp::to_wire;
use nsg_format::{Document, Packet, Result, Timestamp};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON dump options
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Indent the output
    pub pretty: bool,
}

/// Build the NSG JSON value for `doc`, keeping only `packets`.
///
/// Events and locations are always kept in full.
pub fn document_to_value<'a, I>(doc: &Document, packets: I) -> Result<Value>
where
    I: IntoIterator<Item = &'a Packet>,
{
    let mut rows = Vec::new();

    for (ts, location) in doc.locations.located() {
        rows.push(row(ts, KEY_LOCATION, serde_json::to_value(location)?));
    }
    for packet in packets {
        let stamp = row_stamp(doc, &packet.timestamp);
        rows.push(row(
            &stamp,
            KEY_MESSAGES,
            Value::Array(vec![serde_json::to_value(packet)?]),
        ));
    }
    for event in &doc.events {
        let stamp = row_stamp(doc, &event.timestamp);
        rows.push(row(
            &stamp,
            KEY_EVENTS,
            Value::Array(vec![serde_json::to_value(event)?]),
        ));
    }

    let mut root = Map::new();
    root.insert(KEY_DEVICE.to_string(), Value::String(doc.device.clone()));
    root.insert(KEY_START.to_string(), Value::String(to_wire(&doc.start)));
    root.insert(KEY_END.to_string(), Value::String(to_wire(&doc.end)));
    root.insert(KEY_DATA.to_string(), Value::Array(rows));
    Ok(Value::Object(root))
}

/// Write the whole document as NSG JSON.
pub fn write_json<W: Write>(doc: &Document, output: W, opts: &DumpOptions) -> Result<()> {
    write_json_subset(doc, &doc.packets, output, opts)
}

/// Write `doc` as NSG JSON with only the given packets.
pub fn write_json_subset<'a, I, W>(
    doc: &Document,
    packets: I,
    output: W,
    opts: &DumpOptions,
) -> Result<()>
where
    I: IntoIterator<Item = &'a Packet>,
    W: Write,
{
    let value = document_to_value(doc, packets)?;
    let mut writer = BufWriter::new(output);
    if opts.pretty {
        serde_json::to_writer_pretty(&mut writer, &value)?;
    } else {
        serde_json::to_writer(&mut writer, &value)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write the whole document as NSG JSON to `path`.
pub fn write_json_file(doc: &Document, path: impl AsRef<Path>, opts: &DumpOptions) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_json(doc, file, opts)?;
    tracing::debug!("wrote {} packets to {}", doc.packets.len(), path.display());
    Ok(())
}

fn row(ts: &Timestamp, key: &str, payload: Value) -> Value {
    let mut row = Map::new();
    row.insert(KEY_TIMESTAMP.to_string(), Value::String(to_wire(ts)));
    row.insert(key.to_string(), payload);
    Value::Object(row)
}

fn row_stamp(doc: &Document, ts: &Timestamp) -> Timestamp {
    if doc.locations.contains(ts) {
        *ts
    } else if *ts < doc.start {
        doc.start
    } else {
        doc.end
    }
}
