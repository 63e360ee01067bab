//! Growable, write-only buffer for building wire frames.
//!
//! ## Layout
//!
//! A frame is the optional length prefix followed by whatever was appended:
//!
//! ```text
//! [length field (0/1/2/4 bytes)][payload ...]
//! ```
//!
//! The prefix is reserved when the buffer is created (or reset) and patched
//! with the real size when the frame is finished. All integers are written
//! little-endian.
//!
//! ## Growth
//!
//! Capacity grows to the smallest power of two that fits the pending write,
//! never below [`MIN_CAPACITY`], so a long run of appends costs amortized
//! O(1) per byte.

use crate::byte_buffer::ByteBuffer;
use crate::config::{FrameConfig, LengthField};
use crate::endian::{is_little_endian, long_bytes, short_bytes};
use crate::value::FieldValue;
use std::io;
use std::mem;
use tracing::{debug, trace, warn};

/// Smallest capacity allocated by a growth step
pub const MIN_CAPACITY: usize = 32;

/// Write-only byte buffer with optional length-prefix framing.
///
/// # Example
///
/// ```
/// use framewire_core::{LengthField, WriteBuffer};
///
/// let mut buffer = WriteBuffer::with_length_field(LengthField::U16, false);
/// buffer.append_bool(true);
/// buffer.append_string("abc", LengthField::U8);
///
/// let frame = buffer.release();
/// assert_eq!(frame.data(), &[5, 0, 1, 3, b'a', b'b', b'c']);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WriteBuffer {
    data: Vec<u8>,
    /// Capacity granted by the growth policy; `data` may hold more
    capacity: usize,
    config: FrameConfig,
}

impl WriteBuffer {
    /// Creates a buffer and reserves the configured length prefix
    pub fn new(config: FrameConfig) -> Self {
        let mut buffer = Self {
            data: Vec::new(),
            capacity: 0,
            config,
        };
        buffer.reset();
        buffer
    }

    /// Shorthand for [`WriteBuffer::new`] with an explicit prefix layout
    pub fn with_length_field(length_field: LengthField, includes_length_field: bool) -> Self {
        Self::new(
            FrameConfig::new()
                .length_field(length_field)
                .includes_length_field(includes_length_field),
        )
    }

    /// Returns the framing configuration
    pub fn config(&self) -> FrameConfig {
        self.config
    }

    /// Number of bytes written, including the reserved prefix
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing, not even a prefix, has been written
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Capacity granted by the growth policy
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written so far. The prefix is not patched until the frame is
    /// finished.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Drops all content and re-reserves the length prefix
    pub fn reset(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;

        let prefix = self.config.length_field.size();
        if prefix > 0 {
            self.skip_bytes(prefix);
        }
    }

    /// Grows capacity to at least `num_bytes`. No-op if already large enough.
    pub fn reserve(&mut self, num_bytes: usize) {
        if self.capacity < num_bytes {
            self.data.reserve_exact(num_bytes - self.data.len());
            trace!(from = self.capacity, to = num_bytes, "grew write buffer");
            self.capacity = num_bytes;
        }
    }

    /// Forces the written length to `num_bytes`.
    ///
    /// The length never drops below the reserved prefix. Bytes exposed by
    /// growing the length are zero-filled, but callers should treat them as
    /// placeholders and overwrite them.
    pub fn set_size(&mut self, num_bytes: usize) {
        let num_bytes = num_bytes.max(self.config.length_field.size());
        self.reserve(num_bytes);
        self.data.resize(num_bytes, 0);
    }

    /// Advances the cursor by `len` placeholder bytes
    pub fn skip_bytes(&mut self, len: usize) {
        self.ensure_capacity(len);
        let new_len = self.data.len() + len;
        self.data.resize(new_len, 0);
    }

    fn ensure_capacity(&mut self, additional: usize) {
        let total = match self.data.len().checked_add(additional) {
            Some(total) => total,
            None => capacity_overflow(),
        };

        if total > self.capacity {
            let target = match total.max(MIN_CAPACITY).checked_next_power_of_two() {
                Some(target) => target,
                None => capacity_overflow(),
            };
            self.reserve(target);
        }
    }

    /// Appends raw bytes
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.ensure_capacity(bytes.len());
        self.data.extend_from_slice(bytes);
    }

    /// Appends a single byte
    pub fn append_byte(&mut self, byte: u8) {
        self.append_bytes(&[byte]);
    }

    /// Appends a boolean as `0x01` or `0x00`
    pub fn append_bool(&mut self, value: bool) {
        self.append_byte(u8::from(value));
    }

    /// Appends a 16-bit little-endian integer
    pub fn append_short(&mut self, value: i16) {
        self.append_bytes(&short_bytes(value));
    }

    /// Appends a 32-bit little-endian integer
    pub fn append_long(&mut self, value: i32) {
        self.append_bytes(&long_bytes(value));
    }

    /// Appends `value` in a prefix of the given width.
    ///
    /// [`LengthField::None`] writes nothing. Values wider than the field
    /// keep only their low-order bytes.
    pub fn append_length(&mut self, value: u32, length_field: LengthField) {
        match length_field {
            LengthField::None => {}
            LengthField::U8 => self.append_byte(value as u8),
            LengthField::U16 => self.append_short(value as u16 as i16),
            LengthField::U32 => self.append_long(value as i32),
        }
    }

    /// Appends the byte length of `value`, then its UTF-8 bytes as-is
    pub fn append_string(&mut self, value: &str, length_field: LengthField) {
        self.append_length(prefix_value(value.len(), length_field), length_field);
        self.append_bytes(value.as_bytes());
    }

    /// Appends the code unit count, then each unit as 16-bit little-endian
    pub fn append_wide_string(&mut self, units: &[u16], length_field: LengthField) {
        self.append_length(prefix_value(units.len(), length_field), length_field);

        if is_little_endian() {
            self.ensure_capacity(units.len() * 2);
            self.data.extend(units.iter().flat_map(|unit| unit.to_ne_bytes()));
        } else {
            for &unit in units {
                self.append_short(unit as i16);
            }
        }
    }

    /// Encodes `value` as UTF-16 and appends it as a wide string
    pub fn append_utf16(&mut self, value: &str, length_field: LengthField) {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.append_wide_string(&units, length_field);
    }

    /// Embeds another buffer as a length-prefixed blob.
    ///
    /// `None` and empty buffers both encode as length 0 with no payload.
    pub fn append_nested_buffer(
        &mut self,
        buffer: Option<&ByteBuffer>,
        length_field: LengthField,
    ) {
        let bytes = buffer.map(ByteBuffer::data).unwrap_or_default();
        self.append_length(prefix_value(bytes.len(), length_field), length_field);

        if !bytes.is_empty() {
            self.append_bytes(bytes);
        }
    }

    /// Appends a typed field value
    pub fn append_value(&mut self, value: &FieldValue) {
        value.write_to(self);
    }

    /// Overwrites already written bytes starting at `pos`.
    ///
    /// Does not move the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `pos + bytes.len()` exceeds [`len`](Self::len).
    pub fn set_bytes(&mut self, pos: usize, bytes: &[u8]) {
        debug_assert!(
            pos + bytes.len() <= self.data.len(),
            "patch {}..{} outside written region of {} bytes",
            pos,
            pos + bytes.len(),
            self.data.len()
        );
        self.data[pos..pos + bytes.len()].copy_from_slice(bytes);
    }

    /// Overwrites one byte at `pos`
    pub fn set_byte(&mut self, pos: usize, byte: u8) {
        self.set_bytes(pos, &[byte]);
    }

    /// Overwrites a 16-bit little-endian integer at `pos`
    pub fn set_short(&mut self, pos: usize, value: i16) {
        self.set_bytes(pos, &short_bytes(value));
    }

    /// Overwrites a 32-bit little-endian integer at `pos`
    pub fn set_long(&mut self, pos: usize, value: i32) {
        self.set_bytes(pos, &long_bytes(value));
    }

    /// Finishes the frame and hands over the storage without copying.
    ///
    /// The buffer is left as if freshly constructed, prefix reserved, ready
    /// for the next frame.
    pub fn release(&mut self) -> ByteBuffer {
        let mut data = mem::take(&mut self.data);
        self.patch_length_field(&mut data);
        debug!(len = data.len(), "released frame");

        self.reset();
        ByteBuffer::from_vec(data)
    }

    /// Finishes a copy of the frame, leaving this buffer untouched
    pub fn to_byte_buffer(&self) -> ByteBuffer {
        let mut data = self.data.clone();
        self.patch_length_field(&mut data);
        debug!(len = data.len(), "copied frame");

        ByteBuffer::from_vec(data)
    }

    /// Finishes the frame, consuming the buffer
    pub fn into_byte_buffer(self) -> ByteBuffer {
        let WriteBuffer {
            mut data, config, ..
        } = self;
        write_length_prefix(&config, &mut data);
        debug!(len = data.len(), "finished frame");

        ByteBuffer::from_vec(data)
    }

    fn patch_length_field(&self, frame: &mut [u8]) {
        write_length_prefix(&self.config, frame);
    }
}

/// Writes the frame size into the leading length field of `frame`
fn write_length_prefix(config: &FrameConfig, frame: &mut [u8]) {
    let length_field = config.length_field;
    let value = prefix_value(config.encoded_length(frame.len()), length_field);
    match length_field {
        LengthField::None => {}
        LengthField::U8 => frame[0] = value as u8,
        LengthField::U16 => frame[..2].copy_from_slice(&short_bytes(value as u16 as i16)),
        LengthField::U32 => frame[..4].copy_from_slice(&long_bytes(value as i32)),
    }
}

/// Length as it will be encoded, warning when the field truncates it
fn prefix_value(len: usize, length_field: LengthField) -> u32 {
    if length_field != LengthField::None && len > length_field.max_value() as usize {
        warn!(
            len,
            field_size = length_field.size(),
            "length does not fit in prefix, truncating"
        );
    }
    len as u32
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

impl io::Write for WriteBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Extend<u8> for WriteBuffer {
    fn extend<T: IntoIterator<Item = u8>>(&mut self, iter: T) {
        for byte in iter {
            self.append_byte(byte);
        }
    }
}
