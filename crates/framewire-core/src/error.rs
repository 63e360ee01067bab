//! Error types for the framewire-core library.
//!
//! Appending to a [`WriteBuffer`](crate::WriteBuffer) never fails; the
//! variants here cover configuration and input parsing done before any
//! bytes are written.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for framewire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all framewire operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Length field width outside of {0, 1, 2, 4}
    #[error("invalid length field size {size}: must be 0, 1, 2 or 4 bytes")]
    InvalidLengthFieldSize {
        /// The rejected width in bytes
        size: u8,
    },

    /// A textual field value could not be parsed
    #[error("invalid field '{input}': {details}")]
    InvalidField {
        /// The offending input
        input: String,
        /// Detailed description of the issue
        details: String,
    },

    /// Failed to write a finished frame to disk
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new invalid length field size error
    pub fn invalid_length_field_size(size: u8) -> Self {
        Self::InvalidLengthFieldSize { size }
    }

    /// Creates a new invalid field error
    pub fn invalid_field(input: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidField {
            input: input.into(),
            details: details.into(),
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error stems from user-supplied input rather than I/O
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLengthFieldSize { .. } | Self::InvalidField { .. }
        )
    }
}
