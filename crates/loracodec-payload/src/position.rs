//! GPS position fix, port 1 (uplink only).

use loracodec_layout::{Coordinates, Field, FieldKind, Layout, LayoutReader, POSITION};
use serde::{Deserialize, Serialize};

use crate::time::{render_timestamp, TimeZoneMode};

const LAT: Field = Field::new("lat", 0, FieldKind::U24Be);
const LON: Field = Field::new("lon", 3, FieldKind::U24Be);
const ALT: Field = Field::new("alt", 6, FieldKind::U16Le);
const SATELLITES: Field = Field::bits("satellites", 8, 4, 0x0F);
const HDOP: Field = Field::bits("hdop", 8, 0, 0x0F);
const TIME_TO_FIX: Field = Field::new("time_to_fix", 9, FieldKind::U8);
const EPE: Field = Field::new("epe", 10, FieldKind::U8);
const SNR: Field = Field::new("snr", 11, FieldKind::U8);
const LUX: Field = Field::new("lux", 12, FieldKind::U8);
const MOTION: Field = Field::new("motion", 13, FieldKind::U8);
const TIME: Field = Field::new("time", 14, FieldKind::U32Le);

/// Wire layout of a position fix.
pub const LAYOUT: Layout = Layout::new(
    POSITION,
    "POSITION",
    18,
    &[LAT, LON, ALT, SATELLITES, HDOP, TIME_TO_FIX, EPE, SNR, LUX, MOTION, TIME],
);

/// A single GPS fix with its quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub lat: f64,
    pub lon: f64,
    /// Altitude in metres.
    pub alt: u16,
    pub satellites: u8,
    pub hdop: u8,
    /// Seconds the receiver needed to get the fix.
    pub time_to_fix: u8,
    /// Estimated horizontal position error.
    pub epe: u8,
    pub snr: u8,
    pub lux: u8,
    pub motion: u8,
    /// UNIX seconds of the fix.
    pub time: u32,
    pub time_decoded: String,
}

impl PositionFix {
    pub(crate) fn read(reader: &LayoutReader<'_>, zone: TimeZoneMode) -> Self {
        let byte = |field: &Field| reader.get(field) as u8;
        let coords = Coordinates::from_raw(reader.get(&LAT) as u32, reader.get(&LON) as u32);
        let time = reader.get(&TIME) as u32;

        Self {
            lat: coords.lat,
            lon: coords.lon,
            alt: reader.get(&ALT) as u16,
            satellites: byte(&SATELLITES),
            hdop: byte(&HDOP),
            time_to_fix: byte(&TIME_TO_FIX),
            epe: byte(&EPE),
            snr: byte(&SNR),
            lux: byte(&LUX),
            motion: byte(&MOTION),
            time,
            time_decoded: render_timestamp(time, zone),
        }
    }
}
