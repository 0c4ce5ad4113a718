use loracodec_layout::{
    LayoutConfig, LayoutReader, LOCATION_HISTORY, POSITION, SETTINGS, STATUS,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::history::{self, LocationHistory};
use crate::position::{self, PositionFix};
use crate::settings::{self, Settings};
use crate::status::{self, StatusReport};

/// A record received from the device.
///
/// Serializes as the bare record object; [`Uplink::Empty`] serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Uplink {
    Position(PositionFix),
    LocationHistory(LocationHistory),
    Status(StatusReport),
    Settings(Settings),
    /// The port has no uplink layout.
    Empty {},
}

impl Uplink {
    pub fn is_empty(&self) -> bool {
        matches!(self, Uplink::Empty {})
    }
}

/// Decode an uplink received on `port` with default configuration.
pub fn decode(port: u8, bytes: &[u8]) -> Result<Uplink> {
    decode_with_config(port, bytes, &DecodeConfig::default())
}

/// Decode an uplink received on `port`.
///
/// Ports without an uplink layout decode to [`Uplink::Empty`]. Frames shorter
/// than the port's layout fail with a truncated-frame error.
pub fn decode_with_config(port: u8, bytes: &[u8], config: &DecodeConfig) -> Result<Uplink> {
    let layout_config = LayoutConfig {
        strict_length: config.strict_length,
    };

    let uplink = match port {
        POSITION => {
            let reader = LayoutReader::with_config(&position::LAYOUT, bytes, layout_config)?;
            Uplink::Position(PositionFix::read(&reader, config.time_zone))
        }
        SETTINGS => {
            let reader = LayoutReader::with_config(&settings::LAYOUT, bytes, layout_config)?;
            Uplink::Settings(Settings::read(&reader))
        }
        LOCATION_HISTORY => {
            let reader = LayoutReader::with_config(&history::LAYOUT, bytes, layout_config)?;
            Uplink::LocationHistory(LocationHistory::read(&reader, config.time_zone))
        }
        STATUS => {
            let reader = LayoutReader::with_config(&status::LAYOUT, bytes, layout_config)?;
            Uplink::Status(StatusReport::read(&reader))
        }
        _ => {
            debug!(port, size = bytes.len(), "no uplink layout, returning empty record");
            return Ok(Uplink::Empty {});
        }
    };

    debug!(port, size = bytes.len(), "decoded uplink");
    Ok(uplink)
}

/// Decode an uplink straight to its JSON object.
pub fn decode_value(port: u8, bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::to_value(decode(port, bytes)?)?)
}
