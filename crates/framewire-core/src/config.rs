//! Length-prefix configuration.
//!
//! A frame may start with a fixed-width little-endian length field. Its
//! width is one of four values; anything else is rejected when the
//! configuration is built, never at write time.

use crate::error::{Error, Result};
use std::fmt;

/// Width of a little-endian length prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LengthField {
    /// No prefix is written
    #[default]
    None = 0,
    /// 1-byte prefix
    U8 = 1,
    /// 2-byte prefix
    U16 = 2,
    /// 4-byte prefix
    U32 = 4,
}

impl LengthField {
    /// Number of bytes the prefix occupies
    pub const fn size(self) -> usize {
        self as usize
    }

    /// Largest value the prefix can hold without truncation
    pub const fn max_value(self) -> u32 {
        match self {
            LengthField::None => 0,
            LengthField::U8 => u8::MAX as u32,
            LengthField::U16 => u16::MAX as u32,
            LengthField::U32 => u32::MAX,
        }
    }

    /// Returns true if `value` is representable in this prefix
    pub const fn fits(self, value: u32) -> bool {
        value <= self.max_value()
    }
}

impl TryFrom<u8> for LengthField {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(LengthField::None),
            1 => Ok(LengthField::U8),
            2 => Ok(LengthField::U16),
            4 => Ok(LengthField::U32),
            _ => Err(Error::invalid_length_field_size(value)),
        }
    }
}

impl std::str::FromStr for LengthField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let size: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_field(s, "length field size must be 0, 1, 2 or 4"))?;
        LengthField::try_from(size)
    }
}

impl fmt::Display for LengthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size())
    }
}

/// Framing configuration for a [`WriteBuffer`](crate::WriteBuffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameConfig {
    /// Width of the prefix reserved at offset 0
    pub length_field: LengthField,
    /// Whether the encoded length counts the prefix itself
    pub includes_length_field: bool,
}

impl FrameConfig {
    /// Creates a config with no length prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length field width
    pub fn length_field(mut self, length_field: LengthField) -> Self {
        self.length_field = length_field;
        self
    }

    /// Sets whether the encoded length includes the prefix width
    pub fn includes_length_field(mut self, include: bool) -> Self {
        self.includes_length_field = include;
        self
    }

    /// Value written into the prefix for a frame of `total_len` bytes
    pub(crate) fn encoded_length(&self, total_len: usize) -> usize {
        if self.includes_length_field {
            total_len
        } else {
            total_len.saturating_sub(self.length_field.size())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_field_conversion() {
        assert_eq!(LengthField::try_from(0).unwrap(), LengthField::None);
        assert_eq!(LengthField::try_from(1).unwrap(), LengthField::U8);
        assert_eq!(LengthField::try_from(2).unwrap(), LengthField::U16);
        assert_eq!(LengthField::try_from(4).unwrap(), LengthField::U32);
        assert!(LengthField::try_from(3).is_err());
        assert!(LengthField::try_from(8).is_err());
    }

    #[test]
    fn test_length_field_from_str() {
        assert_eq!("2".parse::<LengthField>().unwrap(), LengthField::U16);
        assert!("two".parse::<LengthField>().is_err());
        assert!(matches!(
            "3".parse::<LengthField>(),
            Err(Error::InvalidLengthFieldSize { size: 3 })
        ));
    }

    #[test]
    fn test_length_field_limits() {
        assert_eq!(LengthField::None.size(), 0);
        assert_eq!(LengthField::U32.size(), 4);
        assert!(LengthField::U8.fits(255));
        assert!(!LengthField::U8.fits(256));
        assert!(LengthField::U16.fits(65_535));
        assert!(LengthField::U32.fits(u32::MAX));
    }

    #[test]
    fn test_frame_config_builder() {
        let config = FrameConfig::new()
            .length_field(LengthField::U16)
            .includes_length_field(true);

        assert_eq!(config.length_field, LengthField::U16);
        assert!(config.includes_length_field);
        assert_eq!(config.encoded_length(12), 12);
        assert_eq!(config.includes_length_field(false).encoded_length(12), 10);
    }
}
