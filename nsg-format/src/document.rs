//! Parsed NSG dump

use crate::event::ModemEvent;
use crate::filter::PacketFilter;
use crate::location::{Location, LocationMap};
use crate::packet::Packet;
use crate::timestamp::Timestamp;
use crate::types::Category;
use std::collections::{BTreeMap, BTreeSet};

/// Everything recovered from one NSG JSON dump
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Capturing device
    pub device: String,
    /// Capture start
    pub start: Timestamp,
    /// Capture end
    pub end: Timestamp,
    /// Layer-3 messages in file order
    pub packets: Vec<Packet>,
    /// Modem events in file order
    pub events: Vec<ModemEvent>,
    /// Per-second GPS fixes
    pub locations: LocationMap,
}

impl Document {
    /// Empty document covering `[start, end]`.
    pub fn new(device: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        Self {
            device: device.into(),
            locations: LocationMap::new(&start, &end),
            start,
            end,
            packets: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Packets matching `filter`, in file order.
    pub fn filter_packets<'a>(&'a self, filter: &'a PacketFilter) -> impl Iterator<Item = &'a Packet> + 'a {
        self.packets.iter().filter(move |packet| filter.matches(packet))
    }

    /// Fix recorded during the second containing `ts`.
    pub fn location_at(&self, ts: &Timestamp) -> Option<&Location> {
        self.locations.get(ts)
    }

    /// Packet count per category.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for packet in &self.packets {
            *counts.entry(packet.category).or_default() += 1;
        }
        counts
    }

    /// Distinct channel numbers seen across packets.
    pub fn frequencies(&self) -> BTreeSet<u32> {
        self.packets
            .iter()
            .filter_map(|packet| packet.frequency)
            .collect()
    }
}

/// Counters reported by the record mapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Rows in `data`
    pub rows: usize,
    /// Rows dropped: no timestamp, out of range, or malformed (lenient)
    pub skipped_rows: usize,
    /// Messages, events or locations dropped as malformed (lenient)
    pub skipped_entries: usize,
}
