//! Spectrum scan request, port 30 (downlink only).

use bytes::Bytes;
use loracodec_layout::{Field, FieldKind, Layout, LayoutWriter, SPECTRUM_SCAN};
use serde::{Deserialize, Serialize};

use crate::wrapping;

const FREQ_START: Field = Field::new("freq_start", 0, FieldKind::U32Le);
const FREQ_STOP: Field = Field::new("freq_stop", 4, FieldKind::U32Le);
const SAMPLES: Field = Field::new("samples", 8, FieldKind::U32Le);
const POWER: Field = Field::new("power", 12, FieldKind::U16Le);
const TIME: Field = Field::new("time", 14, FieldKind::U16Le);
const TYPE: Field = Field::new("type", 16, FieldKind::U16Le);

/// Wire layout of the spectrum scan request.
pub const LAYOUT: Layout = Layout::new(
    SPECTRUM_SCAN,
    "SPECTRUM_SCAN",
    18,
    &[FREQ_START, FREQ_STOP, SAMPLES, POWER, TIME, TYPE],
);

/// Ask the radio to sweep a frequency band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectrumScan {
    /// First frequency in Hz.
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub freq_start: u32,
    /// Last frequency in Hz.
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub freq_stop: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub samples: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub power: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    pub time: u32,
    #[serde(deserialize_with = "wrapping::deserialize")]
    #[serde(rename = "type")]
    pub scan_type: u32,
}

impl SpectrumScan {
    /// Pack the request into its 18-byte downlink.
    pub fn encode(&self) -> Bytes {
        let mut writer = LayoutWriter::new(&LAYOUT);
        writer
            .put(&FREQ_START, self.freq_start.into())
            .put(&FREQ_STOP, self.freq_stop.into())
            .put(&SAMPLES, self.samples.into())
            .put(&POWER, self.power.into())
            .put(&TIME, self.time.into())
            .put(&TYPE, self.scan_type.into());
        writer.finish()
    }
}
