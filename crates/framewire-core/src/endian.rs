//! Host/wire byte order conversion.
//!
//! The wire format is little-endian. These helpers return a value whose
//! native in-memory representation is already in wire order, so writing its
//! native bytes produces the correct encoding on any host.

/// Returns true if the host stores integers least-significant byte first
#[inline]
pub const fn is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

/// Converts a 16-bit value to wire (little-endian) order
#[inline]
pub const fn short_to_little_endian(value: i16) -> i16 {
    value.to_le()
}

/// Converts a 32-bit value to wire (little-endian) order
#[inline]
pub const fn long_to_little_endian(value: i32) -> i32 {
    value.to_le()
}

/// Native bytes of [`short_to_little_endian`]
#[inline]
pub(crate) const fn short_bytes(value: i16) -> [u8; 2] {
    short_to_little_endian(value).to_ne_bytes()
}

/// Native bytes of [`long_to_little_endian`]
#[inline]
pub(crate) const fn long_bytes(value: i32) -> [u8; 4] {
    long_to_little_endian(value).to_ne_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_order_matches_target() {
        assert_eq!(is_little_endian(), 1u16.to_ne_bytes() == [1, 0]);
    }

    #[test]
    fn test_short_bytes_are_little_endian() {
        assert_eq!(short_bytes(0x0102), [0x02, 0x01]);
        assert_eq!(short_bytes(-2), [0xFE, 0xFF]);
    }

    #[test]
    fn test_long_bytes_are_little_endian() {
        assert_eq!(long_bytes(0x0102_0304), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(long_bytes(i32::MIN), [0x00, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_conversion_is_involution() {
        for v in [0i16, 1, -1, 0x1234, i16::MIN, i16::MAX] {
            assert_eq!(short_to_little_endian(short_to_little_endian(v)), v);
        }
        for v in [0i32, 1, -1, 0x1234_5678, i32::MIN, i32::MAX] {
            assert_eq!(long_to_little_endian(long_to_little_endian(v)), v);
        }
    }
}
