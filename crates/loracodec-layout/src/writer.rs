use bytes::{Bytes, BytesMut};

use crate::codec::{encode_field, Field, Layout};

/// Packs field values into a zero-filled buffer sized for a port layout.
///
/// Values are masked to the field width and never range-checked.
pub struct LayoutWriter<'a> {
    layout: &'a Layout,
    buf: BytesMut,
}

impl<'a> LayoutWriter<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            buf: BytesMut::zeroed(layout.wire_size()),
        }
    }

    /// Store a field of the first (or only) entry.
    pub fn put(&mut self, field: &Field, value: i64) -> &mut Self {
        self.put_at(0, field, value)
    }

    /// Store a field of entry `entry`.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is not below the layout's repeat count.
    pub fn put_at(&mut self, entry: usize, field: &Field, value: i64) -> &mut Self {
        assert!(
            entry < self.layout.repeat,
            "entry {entry} out of range for {}",
            self.layout.name
        );
        let start = entry * self.layout.size;
        encode_field(&mut self.buf[start..start + self.layout.size], field, value);
        self
    }

    /// Set a single-bit field.
    pub fn put_flag(&mut self, field: &Field, set: bool) -> &mut Self {
        self.put(field, i64::from(set))
    }

    /// The layout being written.
    pub fn layout(&self) -> &Layout {
        self.layout
    }

    /// Finish and return the packed payload.
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
