//! Per-port telemetry and configuration records for a LoRaWAN GPS tracker.
//!
//! Two pure entry points dispatch on the application port:
//! - [`encode`] turns a downlink record (settings, spectrum scan, command) into bytes
//! - [`decode`] turns uplink bytes (position, location history, status, settings) into a record
//!
//! Unknown ports are not errors: they encode to an empty payload and decode to
//! [`Uplink::Empty`]. Short frames are rejected with a truncated-frame error.
//!
//! ```
//! use loracodec_payload::{decode, encode, CommandKind, DeviceCommand, Downlink, Uplink};
//!
//! let bytes = encode(99, &Downlink::Command(DeviceCommand::new(CommandKind::Reset))).unwrap();
//! assert_eq!(bytes.as_ref(), &[0xAB]);
//!
//! assert!(matches!(decode(42, &[1, 2, 3]).unwrap(), Uplink::Empty {}));
//! ```

pub mod command;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
mod flag;
pub mod history;
pub mod position;
pub mod scan;
pub mod settings;
pub mod status;
pub mod time;
mod wrapping;

use loracodec_layout::Layout;

pub use command::{CommandFlags, CommandKind, DeviceCommand};
pub use config::DecodeConfig;
pub use decode::{decode, decode_value, decode_with_config, Uplink};
pub use encode::{encode, encode_value, Downlink};
pub use error::{PayloadError, Result};
pub use history::{Location, LocationHistory};
pub use position::PositionFix;
pub use scan::SpectrumScan;
pub use settings::{DatarateAdr, GpsSettings, Settings, SystemFunctions};
pub use status::{FunctionErrors, ResetCause, StatusReport};
pub use time::{render_timestamp, TimeZoneMode};

/// Field tables of every port with a defined layout, in port order.
pub fn layouts() -> [&'static Layout; 6] {
    [
        &position::LAYOUT,
        &settings::LAYOUT,
        &history::LAYOUT,
        &status::LAYOUT,
        &scan::LAYOUT,
        &command::LAYOUT,
    ]
}

/// Field table for a port, if it has one.
pub fn layout_for(port: u8) -> Option<&'static Layout> {
    layouts().into_iter().find(|layout| layout.port == port)
}
