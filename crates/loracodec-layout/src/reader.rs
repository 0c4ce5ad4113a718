use tracing::debug;

use crate::codec::{decode_field, Field, Layout, LayoutConfig};
use crate::error::{LayoutError, Result};

/// Reads fields out of a received payload according to a port layout.
///
/// The length check happens once in the constructor, so every `get` afterwards
/// is in bounds. The input is only borrowed.
pub struct LayoutReader<'a> {
    layout: &'a Layout,
    src: &'a [u8],
}

impl<'a> LayoutReader<'a> {
    /// Create a reader with default configuration (trailing bytes ignored).
    pub fn new(layout: &'a Layout, src: &'a [u8]) -> Result<Self> {
        Self::with_config(layout, src, LayoutConfig::default())
    }

    /// Create a reader with explicit configuration.
    pub fn with_config(layout: &'a Layout, src: &'a [u8], config: LayoutConfig) -> Result<Self> {
        let expected = layout.wire_size();
        if src.len() < expected {
            return Err(LayoutError::Truncated {
                port: layout.port,
                expected,
                actual: src.len(),
            });
        }
        if src.len() > expected {
            if config.strict_length {
                return Err(LayoutError::Oversized {
                    port: layout.port,
                    expected,
                    actual: src.len(),
                });
            }
            debug!(
                port = layout.port,
                expected,
                actual = src.len(),
                "ignoring trailing payload bytes"
            );
        }

        Ok(Self {
            layout,
            src: &src[..expected],
        })
    }

    /// Read a field of the first (or only) entry.
    pub fn get(&self, field: &Field) -> i64 {
        self.get_at(0, field)
    }

    /// Read a field of entry `entry`.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is not below the layout's repeat count.
    pub fn get_at(&self, entry: usize, field: &Field) -> i64 {
        assert!(
            entry < self.layout.repeat,
            "entry {entry} out of range for {}",
            self.layout.name
        );
        let start = entry * self.layout.size;
        decode_field(&self.src[start..start + self.layout.size], field)
    }

    /// Read a single-bit field as a flag.
    pub fn flag(&self, field: &Field) -> bool {
        self.get(field) != 0
    }

    /// Number of entries in the payload.
    pub fn entries(&self) -> usize {
        self.layout.repeat
    }

    /// The layout being read.
    pub fn layout(&self) -> &Layout {
        self.layout
    }

    /// The bytes covered by the layout.
    pub fn as_bytes(&self) -> &[u8] {
        self.src
    }
}
