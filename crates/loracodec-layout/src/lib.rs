//! Declarative fixed-offset field tables for LoRaWAN port payloads.
//!
//! Every port carries a record with a fixed shape. A [`Layout`] lists the
//! record's fields as (offset, kind) pairs and one generic routine packs
//! ([`LayoutWriter`]) or unpacks ([`LayoutReader`]) any table:
//! - little-endian 8/16/32-bit scalars
//! - big-endian 24-bit coordinate triples
//! - sub-byte bit fields sharing a byte with their neighbours
//! - one-byte millivolt readings on a 10 mV grid above 2500 mV
//!
//! Nothing here allocates beyond the output buffer or holds state between calls.

pub mod codec;
pub mod error;
pub mod port;
pub mod reader;
pub mod scale;
pub mod writer;

pub use codec::{Field, FieldKind, Layout, LayoutConfig, MILLIVOLT_BASE, MILLIVOLT_STEP};
pub use error::{LayoutError, Result};
pub use port::{
    port_name, COMMAND, LOCATION_HISTORY, POSITION, SETTINGS, SPECTRUM_SCAN, STATUS,
};
pub use reader::LayoutReader;
pub use scale::{get_num, round_to, Coordinates, COORDINATE_FULL_SCALE};
pub use writer::LayoutWriter;
