//! Loader for NSG JSON dumps

use nsg_format::{map_document, Document, NsgError, ParseOptions, ParseStats, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Label used in parse errors for input that did not come from a file.
pub const MEMORY_LABEL: &str = "<memory>";

/// Read and map the dump at `path`.
///
/// A missing/unreadable file or invalid JSON is a [`NsgError::Parse`];
/// content that does not fit the NSG layout is a [`NsgError::Schema`].
pub fn read_document(
    path: impl AsRef<Path>,
    opts: &ParseOptions,
) -> Result<(Document, ParseStats)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| NsgError::parse(path, err.to_string()))?;
    tracing::debug!("reading {}", path.display());
    read_document_from(BufReader::new(file), path, opts)
}

/// Read and map a dump from any byte source; `label` names it in errors.
pub fn read_document_from<R: Read>(
    reader: R,
    label: impl AsRef<Path>,
    opts: &ParseOptions,
) -> Result<(Document, ParseStats)> {
    let value: Value = serde_json::from_reader(reader)
        .map_err(|err| NsgError::parse(label.as_ref(), err.to_string()))?;
    map_document(&value, opts)
}

/// Read and map a dump held in memory.
pub fn read_document_str(text: &str, opts: &ParseOptions) -> Result<(Document, ParseStats)> {
    read_document_from(text.as_bytes(), MEMORY_LABEL, opts)
}
