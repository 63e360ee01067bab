//! Typed field values and their textual form.
//!
//! A field is written on the command line as `kind[/prefix]:value`:
//!
//! | kind    | value                     | encoding                         |
//! |---------|---------------------------|----------------------------------|
//! | `byte`  | 0..=255                   | 1 byte                           |
//! | `bool`  | `true`/`false`/`1`/`0`    | `0x01` / `0x00`                  |
//! | `short` | i16 (or u16 bit pattern)  | 2 bytes LE                       |
//! | `long`  | i32 (or u32 bit pattern)  | 4 bytes LE                       |
//! | `hex`   | hex digits                | raw bytes, no prefix             |
//! | `str`   | text                      | prefix + UTF-8 bytes             |
//! | `wstr`  | text                      | prefix (code units) + UTF-16 LE  |
//! | `blob`  | hex digits                | prefix + nested bytes            |
//!
//! `prefix` is the length field width (0, 1, 2 or 4) and is only accepted by
//! the length-prefixed kinds. Integers may be given in decimal or with a
//! `0x` prefix.

use crate::byte_buffer::ByteBuffer;
use crate::config::LengthField;
use crate::error::{Error, Result};
use crate::write_buffer::WriteBuffer;
use std::fmt;
use std::str::FromStr;

/// A single value that can be appended to a [`WriteBuffer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// One raw byte
    Byte(u8),
    /// Boolean byte
    Bool(bool),
    /// 16-bit integer
    Short(i16),
    /// 32-bit integer
    Long(i32),
    /// Raw bytes without a length prefix
    Bytes(Vec<u8>),
    /// Length-prefixed UTF-8 string
    String {
        /// String content
        value: String,
        /// Prefix width
        prefix: LengthField,
    },
    /// Length-prefixed UTF-16 string
    WideString {
        /// String content, encoded to UTF-16 on write
        value: String,
        /// Prefix width
        prefix: LengthField,
    },
    /// Length-prefixed nested buffer
    Nested {
        /// Embedded bytes
        value: ByteBuffer,
        /// Prefix width
        prefix: LengthField,
    },
}

impl FieldValue {
    /// Appends this value to `buffer`
    pub fn write_to(&self, buffer: &mut WriteBuffer) {
        match self {
            FieldValue::Byte(b) => buffer.append_byte(*b),
            FieldValue::Bool(b) => buffer.append_bool(*b),
            FieldValue::Short(v) => buffer.append_short(*v),
            FieldValue::Long(v) => buffer.append_long(*v),
            FieldValue::Bytes(bytes) => buffer.append_bytes(bytes),
            FieldValue::String { value, prefix } => buffer.append_string(value, *prefix),
            FieldValue::WideString { value, prefix } => buffer.append_utf16(value, *prefix),
            FieldValue::Nested { value, prefix } => {
                buffer.append_nested_buffer(Some(value), *prefix)
            }
        }
    }

    /// Number of bytes this value occupies once written
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::Byte(_) | FieldValue::Bool(_) => 1,
            FieldValue::Short(_) => 2,
            FieldValue::Long(_) => 4,
            FieldValue::Bytes(bytes) => bytes.len(),
            FieldValue::String { value, prefix } => prefix.size() + value.len(),
            FieldValue::WideString { value, prefix } => {
                prefix.size() + value.encode_utf16().count() * 2
            }
            FieldValue::Nested { value, prefix } => prefix.size() + value.len(),
        }
    }

    /// Short name of the value kind, as used in the textual form
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Byte(_) => "byte",
            FieldValue::Bool(_) => "bool",
            FieldValue::Short(_) => "short",
            FieldValue::Long(_) => "long",
            FieldValue::Bytes(_) => "hex",
            FieldValue::String { .. } => "str",
            FieldValue::WideString { .. } => "wstr",
            FieldValue::Nested { .. } => "blob",
        }
    }
}

impl FromStr for FieldValue {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let (head, value) = input
            .split_once(':')
            .ok_or_else(|| Error::invalid_field(input, "expected kind[/prefix]:value"))?;

        let (kind, prefix) = match head.split_once('/') {
            Some((kind, prefix)) => {
                let prefix = prefix
                    .parse::<LengthField>()
                    .map_err(|e| Error::invalid_field(input, e.to_string()))?;
                (kind, Some(prefix))
            }
            None => (head, None),
        };

        let parsed = match kind {
            "byte" => FieldValue::Byte(parse_int(input, value, 0, u8::MAX as i64)? as u8),
            "bool" => FieldValue::Bool(parse_bool(input, value)?),
            "short" => {
                let v = parse_int(input, value, i16::MIN as i64, u16::MAX as i64)?;
                FieldValue::Short(v as u16 as i16)
            }
            "long" => {
                let v = parse_int(input, value, i32::MIN as i64, u32::MAX as i64)?;
                FieldValue::Long(v as u32 as i32)
            }
            "hex" => FieldValue::Bytes(parse_hex(input, value)?),
            "str" => FieldValue::String {
                value: value.to_string(),
                prefix: prefix.unwrap_or_default(),
            },
            "wstr" => FieldValue::WideString {
                value: value.to_string(),
                prefix: prefix.unwrap_or_default(),
            },
            "blob" => FieldValue::Nested {
                value: ByteBuffer::from_vec(parse_hex(input, value)?),
                prefix: prefix.unwrap_or_default(),
            },
            other => {
                return Err(Error::invalid_field(
                    input,
                    format!("unknown kind '{}'", other),
                ))
            }
        };

        if prefix.is_some() && !matches!(kind, "str" | "wstr" | "blob") {
            return Err(Error::invalid_field(
                input,
                format!("kind '{}' does not take a length prefix", kind),
            ));
        }

        Ok(parsed)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Byte(b) => write!(f, "byte:{}", b),
            FieldValue::Bool(b) => write!(f, "bool:{}", b),
            FieldValue::Short(v) => write!(f, "short:{}", v),
            FieldValue::Long(v) => write!(f, "long:{}", v),
            FieldValue::Bytes(bytes) => write!(f, "hex:{}", hex::encode(bytes)),
            FieldValue::String { value, prefix } => write!(f, "str/{}:{}", prefix, value),
            FieldValue::WideString { value, prefix } => write!(f, "wstr/{}:{}", prefix, value),
            FieldValue::Nested { value, prefix } => {
                write!(f, "blob/{}:{}", prefix, hex::encode(value.data()))
            }
        }
    }
}

fn parse_int(input: &str, value: &str, min: i64, max: i64) -> Result<i64> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    if digits.starts_with(['+', '-']) {
        return Err(Error::invalid_field(input, "invalid integer: repeated sign"));
    }

    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|e| Error::invalid_field(input, format!("invalid integer: {}", e)))?;

    let number = if negative {
        magnitude
            .checked_neg()
            .ok_or_else(|| Error::invalid_field(input, "integer overflow"))?
    } else {
        magnitude
    };
    if number < min || number > max {
        return Err(Error::invalid_field(
            input,
            format!("{} out of range {}..={}", number, min, max),
        ));
    }
    Ok(number)
}

fn parse_bool(input: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::invalid_field(input, "expected true, false, 1 or 0")),
    }
}

fn parse_hex(input: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim())
        .map_err(|e| Error::invalid_field(input, format!("invalid hex: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode(fields: &[&str]) -> Vec<u8> {
        let mut buffer = WriteBuffer::default();
        for field in fields {
            buffer.append_value(&field.parse().unwrap());
        }
        buffer.release().data().to_vec()
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!("byte:0x1f".parse::<FieldValue>().unwrap(), FieldValue::Byte(0x1F));
        assert_eq!("bool:true".parse::<FieldValue>().unwrap(), FieldValue::Bool(true));
        assert_eq!("bool:0".parse::<FieldValue>().unwrap(), FieldValue::Bool(false));
        assert_eq!("short:-5".parse::<FieldValue>().unwrap(), FieldValue::Short(-5));
        assert_eq!("short:0xffff".parse::<FieldValue>().unwrap(), FieldValue::Short(-1));
        assert_eq!(
            "long:-0x10".parse::<FieldValue>().unwrap(),
            FieldValue::Long(-16)
        );
    }

    #[test]
    fn test_parse_prefixed() {
        assert_eq!(
            "str/1:abc".parse::<FieldValue>().unwrap(),
            FieldValue::String {
                value: "abc".to_string(),
                prefix: LengthField::U8
            }
        );
        assert_eq!(
            "str:a:b".parse::<FieldValue>().unwrap(),
            FieldValue::String {
                value: "a:b".to_string(),
                prefix: LengthField::None
            }
        );
        assert_eq!(
            "blob/4:0102".parse::<FieldValue>().unwrap(),
            FieldValue::Nested {
                value: ByteBuffer::from_vec(vec![1, 2]),
                prefix: LengthField::U32
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "nokind",
            "float:1.0",
            "byte:256",
            "short:70000",
            "bool:yes",
            "hex:abc",
            "str/3:abc",
            "long/2:5",
            "short:--5",
            "short:-+5",
            "byte:+7",
            "long:--9223372036854775808",
            "long:-0x-1",
        ] {
            let err = bad.parse::<FieldValue>().unwrap_err();
            assert!(err.is_input_error(), "{} -> {}", bad, err);
        }
    }

    #[test]
    fn test_encode_fields() {
        assert_eq!(encode(&["str/1:abc"]), vec![0x03, b'a', b'b', b'c']);
        assert_eq!(
            encode(&["bool:true", "short:258", "hex:beef", "wstr/2:hi"]),
            vec![0x01, 0x02, 0x01, 0xBE, 0xEF, 0x02, 0x00, b'h', 0x00, b'i', 0x00]
        );
    }

    #[test]
    fn test_encoded_len_matches_output() {
        for field in [
            "byte:1",
            "long:7",
            "str/2:hello",
            "wstr/4:h\u{e9}",
            "blob/1:00ff",
            "hex:",
        ] {
            let value: FieldValue = field.parse().unwrap();
            let mut buffer = WriteBuffer::default();
            buffer.append_value(&value);
            assert_eq!(buffer.len(), value.encoded_len(), "{}", field);
        }
    }

    #[test]
    fn test_display_roundtrips() {
        for field in ["byte:7", "short:-3", "str/2:abc", "blob/1:0a0b", "wstr/0:x"] {
            let value: FieldValue = field.parse().unwrap();
            assert_eq!(value.to_string().parse::<FieldValue>().unwrap(), value);
        }
    }
}
