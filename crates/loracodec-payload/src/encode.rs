use bytes::Bytes;
use loracodec_layout::port::is_downlink;
use loracodec_layout::{port_name, COMMAND, SETTINGS, SPECTRUM_SCAN};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::command::DeviceCommand;
use crate::error::{PayloadError, Result};
use crate::scan::SpectrumScan;
use crate::settings::Settings;

/// A record the backend can send to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Downlink {
    Settings(Settings),
    SpectrumScan(SpectrumScan),
    Command(DeviceCommand),
}

impl Downlink {
    /// The port this record travels on.
    pub fn port(&self) -> u8 {
        match self {
            Downlink::Settings(_) => SETTINGS,
            Downlink::SpectrumScan(_) => SPECTRUM_SCAN,
            Downlink::Command(_) => COMMAND,
        }
    }

    fn kind(&self) -> &'static str {
        port_name(self.port())
    }
}

impl From<Settings> for Downlink {
    fn from(value: Settings) -> Self {
        Downlink::Settings(value)
    }
}

impl From<SpectrumScan> for Downlink {
    fn from(value: SpectrumScan) -> Self {
        Downlink::SpectrumScan(value)
    }
}

impl From<DeviceCommand> for Downlink {
    fn from(value: DeviceCommand) -> Self {
        Downlink::Command(value)
    }
}

/// Encode a downlink record for `port`.
///
/// Ports without a downlink layout produce an empty payload. A record that
/// belongs to a different port is rejected.
pub fn encode(port: u8, record: &Downlink) -> Result<Bytes> {
    if !is_downlink(port) {
        debug!(port, "no downlink layout, sending empty payload");
        return Ok(Bytes::new());
    }

    let payload = match (port, record) {
        (SETTINGS, Downlink::Settings(settings)) => settings.encode(),
        (SPECTRUM_SCAN, Downlink::SpectrumScan(scan)) => scan.encode(),
        (COMMAND, Downlink::Command(command)) => command.encode(),
        _ => {
            warn!(port, record = record.kind(), "record does not match port");
            return Err(PayloadError::RecordMismatch {
                port,
                record: record.kind(),
            });
        }
    };

    debug!(port, size = payload.len(), "encoded downlink");
    Ok(payload)
}

/// Encode a JSON object as the record of `port`.
///
/// The value is read as the port's record type; a missing nested record is
/// an [`PayloadError::InvalidRecord`]. Unknown ports produce an empty payload
/// without looking at the value.
pub fn encode_value(port: u8, value: &Value) -> Result<Bytes> {
    let record = match port {
        SETTINGS => Downlink::Settings(parse(port, value)?),
        SPECTRUM_SCAN => Downlink::SpectrumScan(parse(port, value)?),
        COMMAND => Downlink::Command(parse(port, value)?),
        _ => {
            debug!(port, "no downlink layout, sending empty payload");
            return Ok(Bytes::new());
        }
    };
    encode(port, &record)
}

fn parse<T: DeserializeOwned>(port: u8, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|source| PayloadError::InvalidRecord { port, source })
}
