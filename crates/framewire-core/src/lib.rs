//! # framewire-core
//!
//! A growable, write-only byte buffer for serializing typed values into
//! little-endian, optionally length-prefixed wire frames.
//!
//! This crate provides:
//! - [`WriteBuffer`]: amortized-growth storage with typed appends and
//!   in-place patching of fixed-width fields
//! - Length-prefix framing: a 1/2/4-byte size field reserved up front and
//!   patched when the frame is finished
//! - [`ByteBuffer`]: the immutable container a finished frame is handed to,
//!   either zero-copy or as an independent copy
//!
//! ## Architecture
//!
//! - [`write_buffer`]: the buffer itself
//! - [`config`]: length field widths and framing configuration
//! - [`byte_buffer`]: immutable frame container
//! - [`endian`]: host/wire byte order helpers
//! - [`value`]: typed field values and their textual form
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use framewire_core::{ByteBuffer, FrameConfig, LengthField, WriteBuffer};
//!
//! let config = FrameConfig::new()
//!     .length_field(LengthField::U16)
//!     .includes_length_field(false);
//! let mut buffer = WriteBuffer::new(config);
//!
//! buffer.append_long(7);
//! buffer.append_string("hello", LengthField::U8);
//! buffer.append_nested_buffer(None, LengthField::U16);
//!
//! let frame: ByteBuffer = buffer.release();
//! assert_eq!(&frame[..2], &[12, 0]);
//!
//! // The buffer is ready for the next frame
//! assert_eq!(buffer.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod byte_buffer;
pub mod config;
pub mod endian;
pub mod error;
pub mod value;
pub mod write_buffer;

// Re-export primary types for convenience
pub use byte_buffer::ByteBuffer;
pub use config::{FrameConfig, LengthField};
pub use error::{Error, Result};
pub use value::FieldValue;
pub use write_buffer::{WriteBuffer, MIN_CAPACITY};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
