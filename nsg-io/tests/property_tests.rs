//! Property-based tests for JSON dump round-trips

use nsg_format::location::round2;
use nsg_format::{parse_timestamp, Timestamp};
use nsg_io::{
    read_document_str, write_json, Category, Direction, Document, DumpOptions, Location,
    ModemEvent, Packet, ParseOptions,
};
use proptest::prelude::*;
use serde_json::Map;

/// `2023-05-01T10:00:SS.mmm`, `millis` counted from 10:00:00.
fn at(millis: u32) -> Timestamp {
    let text = format!(
        "2023-05-01T10:00:{:02}.{:03}",
        millis / 1000,
        millis % 1000
    );
    parse_timestamp("t", &text).expect("generated timestamp")
}

fn location() -> impl Strategy<Value = Location> {
    (
        proptest::option::of(-9_000_000i32..=9_000_000),
        proptest::option::of(-18_000_000i32..=18_000_000),
        prop_oneof![
            (0u32..100_000).prop_map(|cents| f64::from(cents) / 100.0),
            Just(1e307),
        ],
        0u32..10_000,
    )
        .prop_map(|(lat, lon, accuracy, speed)| Location {
            latitude: lat.map(|v| f64::from(v) / 1e5),
            longitude: lon.map(|v| f64::from(v) / 1e5),
            accuracy: round2(accuracy),
            speed: round2(f64::from(speed) / 100.0),
        })
}

fn packet(span: u32) -> impl Strategy<Value = Packet> {
    (
        0usize..Category::ALL.len(),
        any::<bool>(),
        proptest::option::of(any::<u32>()),
        "[A-Za-z ]{0,16}",
        0..=span * 1000,
        "[A-Za-z0-9+/]{0,12}",
    )
        .prop_map(|(category, up, frequency, title, millis, pcap)| Packet {
            category: Category::ALL[category],
            direction: if up { Direction::Up } else { Direction::Down },
            frequency,
            title,
            timestamp: at(millis),
            detail: Map::new(),
            pcap,
        })
}

fn event(span: u32) -> impl Strategy<Value = ModemEvent> {
    ("[A-Za-z ]{0,16}", "[a-z ,]{0,24}", 0..=span * 1000).prop_map(
        |(title, description, millis)| ModemEvent {
            title,
            description,
            timestamp: at(millis),
        },
    )
}

fn document() -> impl Strategy<Value = Document> {
    (0u32..30).prop_flat_map(|span| {
        (
            proptest::collection::vec((0..=span, location()), 0..8),
            proptest::collection::vec(packet(span), 0..12),
            proptest::collection::vec(event(span), 0..4),
        )
            .prop_map(move |(fixes, packets, events)| {
                let mut doc = Document::new("SM-G991B", at(0), at(span * 1000));
                for (second, fix) in fixes {
                    doc.locations.record(&at(second * 1000), fix);
                }
                doc.packets = packets;
                doc.events = events;
                doc
            })
    })
}

proptest! {
    #[test]
    fn dump_then_reload_is_equivalent(doc in document()) {
        let mut buf = Vec::new();
        write_json(&doc, &mut buf, &DumpOptions::default()).expect("dump");
        let text = String::from_utf8(buf).expect("utf-8 dump");

        let (reloaded, stats) =
            read_document_str(&text, &ParseOptions::default()).expect("reload");
        prop_assert_eq!(stats.skipped_rows, 0);
        prop_assert_eq!(stats.skipped_entries, 0);
        prop_assert_eq!(reloaded, doc);
    }
}
