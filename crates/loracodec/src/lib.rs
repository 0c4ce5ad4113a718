//! Payload codec for a LoRaWAN GPS tracker.
//!
//! Translates between the compact binary frames the tracker exchanges over
//! LoRaWAN and the JSON records a backend works with. The port number selects
//! the record: settings travel on port 3 in both directions, spectrum scan
//! requests (30) and device commands (99) go down, position fixes (1),
//! location history (11) and status reports (12) come up.
//!
//! # Crate Structure
//!
//! - [`layout`] field tables, the generic pack/unpack routine and scaled-value helpers
//! - [`payload`] per-port records and the `encode` / `decode` dispatchers
//! - [`schema`] JSON Schema contracts for downlink records (behind `schema` feature)

/// Re-export layout types.
pub mod layout {
    pub use loracodec_layout::*;
}

/// Re-export payload types.
pub mod payload {
    pub use loracodec_payload::*;
}

/// Re-export schema types (requires `schema` feature).
#[cfg(feature = "schema")]
pub mod schema {
    pub use loracodec_schema::*;
}

pub use loracodec_payload::{decode, decode_with_config, encode, encode_value, Downlink, Uplink};
