//! Buffered location history, port 11 (uplink only).
//!
//! The tracker batches its last five fixes into one frame. Downstream
//! consumers expect the list as one JSON text field named `locations`.

use loracodec_layout::{Coordinates, Field, FieldKind, Layout, LayoutReader, LOCATION_HISTORY};
use serde::{Deserialize, Serialize};

use crate::time::{render_timestamp, TimeZoneMode};

/// Fixes per frame.
pub const ENTRIES: usize = 5;

const LAT: Field = Field::new("lat", 0, FieldKind::U24Be);
const LON: Field = Field::new("lon", 3, FieldKind::U24Be);
const TIME: Field = Field::new("time", 6, FieldKind::U32Le);

/// Wire layout of one history entry, repeated five times.
pub const LAYOUT: Layout =
    Layout::new(LOCATION_HISTORY, "LOCATION_HISTORY", 10, &[LAT, LON, TIME]).repeated(ENTRIES);

/// One buffered fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub time: u32,
    pub time_decoded: String,
}

/// The five most recent fixes, oldest first as sent by the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationHistory {
    #[serde(with = "json_text")]
    pub locations: Vec<Location>,
}

impl LocationHistory {
    pub(crate) fn read(reader: &LayoutReader<'_>, zone: TimeZoneMode) -> Self {
        let locations = (0..reader.entries())
            .map(|entry| {
                let coords = Coordinates::from_raw(
                    reader.get_at(entry, &LAT) as u32,
                    reader.get_at(entry, &LON) as u32,
                );
                let time = reader.get_at(entry, &TIME) as u32;
                Location {
                    lat: coords.lat,
                    lon: coords.lon,
                    time,
                    time_decoded: render_timestamp(time, zone),
                }
            })
            .collect();

        Self { locations }
    }
}

mod json_text {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Location;

    pub fn serialize<S: Serializer>(locations: &[Location], serializer: S) -> Result<S::Ok, S::Error> {
        let text = serde_json::to_string(locations).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Location>, D::Error> {
        let text = String::deserialize(deserializer)?;
        serde_json::from_str(&text).map_err(D::Error::custom)
    }
}
