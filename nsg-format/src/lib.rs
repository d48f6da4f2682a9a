//! NSG Format - Data model for NSG JSON drive-test dumps
//!
//! This crate holds the typed view of an NSG dump with no file I/O:
//!
//! - Wire keys and fixed formats
//! - Error types
//! - Timestamp parsing and second-resolution keys
//! - Packet category/direction enumerations
//! - Packets, modem events and GPS fixes
//! - The record mapper turning raw JSON into a [`Document`]
//! - Packet filters

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod document;
pub mod error;
pub mod event;
mod fields;
pub mod filter;
pub mod location;
pub mod mapper;
pub mod packet;
pub mod timestamp;
pub mod types;

// Re-export commonly used types
pub use document::{Document, ParseStats};
pub use error::{NsgError, Result};
pub use event::ModemEvent;
pub use filter::PacketFilter;
pub use location::{Location, LocationMap};
pub use mapper::{map_document, ParseOptions};
pub use packet::Packet;
pub use timestamp::{parse_timestamp, Timestamp};
pub use types::{Category, Direction};
