//! NSG I/O - Loading, re-serializing and exporting NSG JSON dumps
//!
//! This crate provides the file I/O layer over `nsg-format`:
//!
//! - Loader reading dumps from files, readers or strings
//! - JSON dump writer re-emitting the NSG layout
//! - CSV export of coordinates, signalling and events
//! - [`NsgDump`], the filename-driven entry point

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod export;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use export::{default_output_dir, export_csv, ExportOptions, ExportSummary};
pub use nsg_format::{
    Category, Direction, Document, Location, ModemEvent, NsgError, Packet, PacketFilter,
    ParseOptions, ParseStats, Result, Timestamp,
};
pub use reader::{read_document, read_document_from, read_document_str};
pub use writer::{write_json, write_json_file, write_json_subset, DumpOptions};

use std::fs;
use std::path::{Path, PathBuf};

/// File name of the JSON dump written by [`NsgDump::dump`].
pub const DUMP_FILE: &str = "dump.json";

/// Load the dump at `path` with default (strict) options.
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    read_document(path, &ParseOptions::default()).map(|(doc, _)| doc)
}

/// One NSG dump file and what has been recovered from it
///
/// ```no_run
/// use nsg_io::NsgDump;
///
/// let mut dump = NsgDump::new("captures/drive.json");
/// dump.parse()?;
/// for packet in dump.packets().iter().filter(|p| p.frequency == Some(497)) {
///     println!("{} {} {}", packet.category.value(), packet.direction, packet.title);
/// }
/// dump.dump()?;
/// # Ok::<(), nsg_io::NsgError>(())
/// ```
#[derive(Debug)]
pub struct NsgDump {
    filename: PathBuf,
    output_dir: PathBuf,
    options: ParseOptions,
    dump_options: DumpOptions,
    document: Option<Document>,
    stats: ParseStats,
}

impl NsgDump {
    /// Point at `filename`; outputs go to `output/<stem>` unless overridden.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        let filename = filename.into();
        Self {
            output_dir: default_output_dir(&filename),
            filename,
            options: ParseOptions::default(),
            dump_options: DumpOptions::default(),
            document: None,
            stats: ParseStats::default(),
        }
    }

    /// Replace the record mapper options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the JSON dump options.
    pub fn with_dump_options(mut self, dump_options: DumpOptions) -> Self {
        self.dump_options = dump_options;
        self
    }

    /// Send outputs to `dir` instead of `output/<stem>`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Input file.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Directory receiving [`dump`](Self::dump) and [`export`](Self::export) output.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Read and map the file, replacing anything parsed before.
    pub fn parse(&mut self) -> Result<&Document> {
        let (document, stats) = read_document(&self.filename, &self.options)?;
        self.stats = stats;
        Ok(self.document.insert(document))
    }

    /// Parsed document, if [`parse`](Self::parse) has succeeded.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Parsed packets; empty before parsing.
    pub fn packets(&self) -> &[Packet] {
        self.document
            .as_ref()
            .map(|doc| doc.packets.as_slice())
            .unwrap_or_default()
    }

    /// Parsed modem events; empty before parsing.
    pub fn events(&self) -> &[ModemEvent] {
        self.document
            .as_ref()
            .map(|doc| doc.events.as_slice())
            .unwrap_or_default()
    }

    /// Counters from the last parse.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Write the document back as NSG JSON to `<output_dir>/dump.json`.
    pub fn dump(&self) -> Result<PathBuf> {
        let doc = self.document.as_ref().ok_or(NsgError::NotParsed)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(DUMP_FILE);
        write_json_file(doc, &path, &self.dump_options)?;
        Ok(path)
    }

    /// Write `coordinates.csv`, `signalling.csv` and `events.csv` to the
    /// output directory.
    pub fn export(&self) -> Result<ExportSummary> {
        let doc = self.document.as_ref().ok_or(NsgError::NotParsed)?;
        export_csv(
            doc,
            &ExportOptions {
                output_dir: self.output_dir.clone(),
            },
        )
    }
}
