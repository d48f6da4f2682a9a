//! Wire keys and fixed formats for NSG JSON dumps

/// Top-level key holding the capturing device name.
pub const KEY_DEVICE: &str = "device";
/// Top-level key holding the capture start time.
pub const KEY_START: &str = "starttime";
/// Top-level key holding the capture end time.
pub const KEY_END: &str = "endtime";
/// Top-level key holding the log rows.
pub const KEY_DATA: &str = "data";

/// Row/event timestamp key.
pub const KEY_TIMESTAMP: &str = "Timestamp";
/// Timestamp stamped by the capturing equipment.
pub const KEY_EQUIPMENT_TIMESTAMP: &str = "EquipmentTimestamp";
/// Row key holding a GPS fix.
pub const KEY_LOCATION: &str = "Location";
/// Row key holding layer-3 messages.
pub const KEY_MESSAGES: &str = "messages";
/// Row key holding modem events.
pub const KEY_EVENTS: &str = "events";

/// Packet radio technology / protocol layer.
pub const KEY_CATEGORY: &str = "Category";
/// Packet uplink/downlink marker.
pub const KEY_DIRECTION: &str = "Direction";
/// Packet channel number.
pub const KEY_FREQUENCY: &str = "Frequency";
/// Packet/event title.
pub const KEY_TITLE: &str = "Title";
/// Decoded packet tree, kept opaque.
pub const KEY_DETAIL: &str = "Detail";
/// Raw packet bytes as exported by the logger.
pub const KEY_PCAP: &str = "PCAPPacket";
/// Event description.
pub const KEY_DESCRIPTION: &str = "Description";

/// Location latitude.
pub const KEY_LATITUDE: &str = "Latitude";
/// Location longitude.
pub const KEY_LONGITUDE: &str = "Longitude";
/// Location accuracy in metres.
pub const KEY_ACCURACY: &str = "Accuracy";
/// Location speed.
pub const KEY_SPEED: &str = "Speed";

/// Second-resolution key used in CSV exports (`day-hh:mm:ss`).
pub const TS_KEY_FORMAT: &str = "%d-%H:%M:%S";

/// Longest capture span accepted by default (one week).
pub const DEFAULT_MAX_SPAN_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Header of `coordinates.csv`.
pub const COORDINATES_HEADER: [&str; 5] = ["timestamp", "Latitude", "Longitude", "Accuracy", "Speed"];
/// Header of `signalling.csv`.
pub const SIGNALLING_HEADER: [&str; 7] = [
    "category",
    "direction",
    "detail",
    "timestamp",
    "title",
    "latitude",
    "longitude",
];
/// Header of `events.csv`.
pub const EVENTS_HEADER: [&str; 5] = ["description", "timestamp", "title", "latitude", "longitude"];
