use bytes::{Buf, BufMut};

use crate::error::{LayoutError, Result};

/// Millivolt readings are stored as `(mV - 2500) / 10` in a single byte.
pub const MILLIVOLT_BASE: i64 = 2500;

/// Resolution of a one-byte millivolt reading.
pub const MILLIVOLT_STEP: i64 = 10;

/// How a field is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One unsigned byte.
    U8,
    /// Unsigned 16-bit, little-endian.
    U16Le,
    /// Unsigned 24-bit, big-endian (coordinate triples).
    U24Be,
    /// Unsigned 32-bit, little-endian.
    U32Le,
    /// `mask` bits starting at bit `shift` of one byte. Several bit fields may share a byte.
    Bits { shift: u8, mask: u8 },
    /// One byte holding `(mV - 2500) / 10`.
    Millivolts,
}

impl FieldKind {
    /// Number of bytes the field spans.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::Bits { .. } | FieldKind::Millivolts => 1,
            FieldKind::U16Le => 2,
            FieldKind::U24Be => 3,
            FieldKind::U32Le => 4,
        }
    }

    /// Bit fields are the only kind allowed to share bytes.
    pub const fn is_shared(self) -> bool {
        matches!(self, FieldKind::Bits { .. })
    }
}

/// One entry of a port's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Record field name as it appears in JSON.
    pub name: &'static str,
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Wire representation.
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    /// A single-bit flag at `bit` of the byte at `offset`.
    pub const fn flag(name: &'static str, offset: usize, bit: u8) -> Self {
        Self::new(name, offset, FieldKind::Bits { shift: bit, mask: 0x01 })
    }

    /// A `mask`-wide bit field starting at `shift`.
    pub const fn bits(name: &'static str, offset: usize, shift: u8, mask: u8) -> Self {
        Self::new(name, offset, FieldKind::Bits { shift, mask })
    }

    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// First byte past the field.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

/// The fixed field table of one port.
///
/// Repeated records (several identical entries back to back) describe one
/// entry and set `repeat`; entry `i` starts at `i * size`.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub port: u8,
    pub name: &'static str,
    /// Size of one entry in bytes.
    pub size: usize,
    /// Number of entries on the wire.
    pub repeat: usize,
    pub fields: &'static [Field],
}

impl Layout {
    pub const fn new(port: u8, name: &'static str, size: usize, fields: &'static [Field]) -> Self {
        Self {
            port,
            name,
            size,
            repeat: 1,
            fields,
        }
    }

    /// The same table repeated `count` times.
    pub const fn repeated(mut self, count: usize) -> Self {
        self.repeat = count;
        self
    }

    /// Total number of bytes on the wire.
    pub const fn wire_size(&self) -> usize {
        self.size * self.repeat
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Check that every field lies inside the entry and that whole-byte fields don't overlap.
    pub fn validate(&self) -> Result<()> {
        let mut owner: Vec<Option<&'static str>> = vec![None; self.size];
        let mut shared = vec![0u8; self.size];

        for field in self.fields {
            if field.end() > self.size {
                return Err(self.invalid(format!(
                    "field {} ends at byte {} past entry size {}",
                    field.name,
                    field.end(),
                    self.size
                )));
            }

            if let FieldKind::Bits { shift, mask } = field.kind {
                let bits = mask.checked_shl(u32::from(shift)).unwrap_or(0);
                if bits == 0 || u32::from(mask).leading_zeros() < 24 + u32::from(shift) {
                    return Err(self.invalid(format!("bit field {} does not fit a byte", field.name)));
                }
                if let Some(other) = owner[field.offset] {
                    return Err(self.invalid(format!("{} overlaps {}", field.name, other)));
                }
                if shared[field.offset] & bits != 0 {
                    return Err(self.invalid(format!("bit field {} overlaps a neighbour", field.name)));
                }
                shared[field.offset] |= bits;
                continue;
            }

            for byte in field.offset..field.end() {
                if let Some(other) = owner[byte] {
                    return Err(self.invalid(format!("{} overlaps {}", field.name, other)));
                }
                if shared[byte] != 0 {
                    return Err(self.invalid(format!("{} overlaps a bit field", field.name)));
                }
                owner[byte] = Some(field.name);
            }
        }

        Ok(())
    }

    fn invalid(&self, message: String) -> LayoutError {
        LayoutError::InvalidTable {
            port: self.port,
            message,
        }
    }
}

/// Options for unpacking.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutConfig {
    /// Reject input longer than the layout instead of ignoring the trailing bytes.
    pub strict_length: bool,
}

/// Store `value` into `dst` (one entry) according to `field`, masking it to the field width.
///
/// Bit fields are OR-ed into their byte so neighbours sharing it are preserved.
pub fn encode_field(dst: &mut [u8], field: &Field, value: i64) {
    if let FieldKind::Bits { shift, mask } = field.kind {
        dst[field.offset] |= ((value as u8) & mask) << shift;
        return;
    }

    let mut slot = &mut dst[field.offset..field.end()];
    match field.kind {
        FieldKind::U8 => slot.put_u8(value as u8),
        FieldKind::U16Le => slot.put_u16_le(value as u16),
        FieldKind::U24Be => slot.put_uint(value as u64 & 0x00FF_FFFF, 3),
        FieldKind::U32Le => slot.put_u32_le(value as u32),
        FieldKind::Millivolts => {
            slot.put_u8(((value - MILLIVOLT_BASE) / MILLIVOLT_STEP) as u8);
        }
        FieldKind::Bits { .. } => unreachable!("bit fields are handled above"),
    }
}

/// Read `field` from `src` (one entry). The caller guarantees `src` covers the field.
pub fn decode_field(src: &[u8], field: &Field) -> i64 {
    let mut slot = &src[field.offset..field.end()];
    match field.kind {
        FieldKind::U8 => i64::from(slot.get_u8()),
        FieldKind::U16Le => i64::from(slot.get_u16_le()),
        FieldKind::U24Be => slot.get_uint(3) as i64,
        FieldKind::U32Le => i64::from(slot.get_u32_le()),
        FieldKind::Bits { shift, mask } => i64::from((slot.get_u8() >> shift) & mask),
        FieldKind::Millivolts => i64::from(slot.get_u8()) * MILLIVOLT_STEP + MILLIVOLT_BASE,
    }
}
