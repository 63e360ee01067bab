//! Immutable byte container that receives finished frames.

use bytes::Bytes;
use std::fmt;
use std::ops::Deref;

/// Read-only, cheaply clonable sequence of bytes.
///
/// Built either by taking over an existing allocation ([`ByteBuffer::from_vec`])
/// or by copying ([`ByteBuffer::copy_from_slice`]). Clones share the same
/// storage.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuffer {
    inner: Bytes,
}

impl ByteBuffer {
    /// Creates an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `data` without copying
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            inner: Bytes::from(data),
        }
    }

    /// Copies `data` into a new allocation.
    ///
    /// For callers holding borrowed bytes, e.g. a payload to embed with
    /// [`WriteBuffer::append_nested_buffer`](crate::WriteBuffer::append_nested_buffer).
    ///
    /// ```
    /// use framewire_core::{ByteBuffer, LengthField, WriteBuffer};
    ///
    /// let payload = ByteBuffer::copy_from_slice(b"ok");
    /// let mut buffer = WriteBuffer::default();
    /// buffer.append_nested_buffer(Some(&payload), LengthField::U8);
    /// assert_eq!(buffer.as_bytes(), &[2, b'o', b'k']);
    /// ```
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            inner: Bytes::copy_from_slice(data),
        }
    }

    /// Returns the contents as a slice
    pub fn data(&self) -> &[u8] {
        &self.inner
    }

    /// Number of bytes held
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Unwraps the underlying [`Bytes`]
    pub fn into_bytes(self) -> Bytes {
        self.inner
    }
}

impl Deref for ByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.inner
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<Bytes> for ByteBuffer {
    fn from(inner: Bytes) -> Self {
        Self { inner }
    }
}

impl PartialEq<[u8]> for ByteBuffer {
    fn eq(&self, other: &[u8]) -> bool {
        self.data() == other
    }
}

impl PartialEq<&[u8]> for ByteBuffer {
    fn eq(&self, other: &&[u8]) -> bool {
        self.data() == *other
    }
}

impl PartialEq<Vec<u8>> for ByteBuffer {
    fn eq(&self, other: &Vec<u8>) -> bool {
        self.data() == other.as_slice()
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("len", &self.len())
            .field("data", &hex::encode(self.data()))
            .finish()
    }
}
