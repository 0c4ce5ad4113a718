//! Known LoRaWAN application ports.
//!
//! Uplink ports are sent by the device, downlink ports by the backend.
//! Port 3 travels both ways: the device echoes its settings on request.

/// GPS position fix (uplink).
pub const POSITION: u8 = 1;

/// Device settings (downlink and uplink).
pub const SETTINGS: u8 = 3;

/// Five buffered GPS fixes (uplink).
pub const LOCATION_HISTORY: u8 = 11;

/// Periodic status telemetry (uplink).
pub const STATUS: u8 = 12;

/// Spectrum scan request (downlink).
pub const SPECTRUM_SCAN: u8 = 30;

/// Single-byte device command (downlink).
pub const COMMAND: u8 = 99;

/// Returns a human-readable name for a port.
pub fn port_name(port: u8) -> &'static str {
    match port {
        POSITION => "POSITION",
        SETTINGS => "SETTINGS",
        LOCATION_HISTORY => "LOCATION_HISTORY",
        STATUS => "STATUS",
        SPECTRUM_SCAN => "SPECTRUM_SCAN",
        COMMAND => "COMMAND",
        _ => "UNKNOWN",
    }
}

/// Returns true if the decoder has a layout for the port.
pub fn is_uplink(port: u8) -> bool {
    matches!(port, POSITION | SETTINGS | LOCATION_HISTORY | STATUS)
}

/// Returns true if the encoder has a layout for the port.
pub fn is_downlink(port: u8) -> bool {
    matches!(port, SETTINGS | SPECTRUM_SCAN | COMMAND)
}

/// Resolve a port from its name, case-insensitive.
pub fn port_from_name(name: &str) -> Option<u8> {
    match name.to_ascii_uppercase().as_str() {
        "POSITION" => Some(POSITION),
        "SETTINGS" => Some(SETTINGS),
        "LOCATION_HISTORY" => Some(LOCATION_HISTORY),
        "STATUS" => Some(STATUS),
        "SPECTRUM_SCAN" => Some(SPECTRUM_SCAN),
        "COMMAND" => Some(COMMAND),
        _ => None,
    }
}
