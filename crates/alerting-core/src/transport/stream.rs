//! Binary stream layer used for node-to-node payloads.
//!
//! Encoding rules:
//! - vint: 7 bits per byte, low bits first, high bit set on every byte but the last (max 5 bytes)
//! - i64: 8 bytes big-endian
//! - bool: one byte, `0` or `1`
//! - string: vint byte length followed by UTF-8 bytes
//! - optional string: bool presence flag, then the string

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("unexpected end of stream: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid utf-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("vint is longer than 5 bytes")]
    VIntTooLong,

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("invalid ordinal {ordinal} for {kind}")]
    InvalidOrdinal { kind: &'static str, ordinal: u32 },

    #[error("timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),

    #[error("length {0} does not fit in a u32 length prefix")]
    LengthOverflow(usize),
}

/// Read side of the binary wire format.
pub trait StreamInput {
    fn read_u8(&mut self) -> Result<u8, StreamError>;

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, StreamError>;

    fn read_bool(&mut self) -> Result<bool, StreamError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StreamError::InvalidBool(other)),
        }
    }

    fn read_vint(&mut self) -> Result<u32, StreamError> {
        let mut value = 0u32;
        for shift in (0..35).step_by(7) {
            let b = self.read_u8()?;
            // fifth byte may only carry the top 4 bits
            if shift == 28 && b & 0xF0 != 0 {
                return Err(StreamError::VIntTooLong);
            }
            value |= u32::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(StreamError::VIntTooLong)
    }

    fn read_i64(&mut self) -> Result<i64, StreamError> {
        let mut raw = self.read_bytes(8)?;
        Ok(raw.get_i64())
    }

    fn read_string(&mut self) -> Result<String, StreamError> {
        let len = self.read_vint()? as usize;
        let raw = self.read_bytes(len)?;
        Ok(String::from_utf8(raw.to_vec())?)
    }

    fn read_optional_string(&mut self) -> Result<Option<String>, StreamError> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    fn read_string_list(&mut self) -> Result<Vec<String>, StreamError> {
        let len = self.read_vint()? as usize;
        (0..len).map(|_| self.read_string()).collect()
    }
}

/// Write side of the binary wire format.
pub trait StreamOutput {
    fn write_u8(&mut self, value: u8) -> Result<(), StreamError>;

    fn write_bytes(&mut self, value: &[u8]) -> Result<(), StreamError>;

    fn write_bool(&mut self, value: bool) -> Result<(), StreamError> {
        self.write_u8(u8::from(value))
    }

    fn write_vint(&mut self, mut value: u32) -> Result<(), StreamError> {
        while value & !0x7F != 0 {
            self.write_u8(((value & 0x7F) | 0x80) as u8)?;
            value >>= 7;
        }
        self.write_u8(value as u8)
    }

    /// Length prefix for strings and lists.
    fn write_len(&mut self, len: usize) -> Result<(), StreamError> {
        let prefix = u32::try_from(len).map_err(|_| StreamError::LengthOverflow(len))?;
        self.write_vint(prefix)
    }

    fn write_i64(&mut self, value: i64) -> Result<(), StreamError> {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_string(&mut self, value: &str) -> Result<(), StreamError> {
        self.write_len(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    fn write_optional_string(&mut self, value: Option<&str>) -> Result<(), StreamError> {
        match value {
            Some(s) => {
                self.write_bool(true)?;
                self.write_string(s)
            }
            None => self.write_bool(false),
        }
    }

    fn write_string_list(&mut self, values: &[String]) -> Result<(), StreamError> {
        self.write_len(values.len())?;
        for v in values {
            self.write_string(v)?;
        }
        Ok(())
    }
}

/// [`StreamInput`] over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct BytesStreamInput {
    buf: Bytes,
}

impl BytesStreamInput {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }
}

impl StreamInput for BytesStreamInput {
    fn read_u8(&mut self) -> Result<u8, StreamError> {
        if !self.buf.has_remaining() {
            return Err(StreamError::UnexpectedEof {
                needed: 1,
                remaining: 0,
            });
        }
        Ok(self.buf.get_u8())
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, StreamError> {
        if self.buf.remaining() < len {
            return Err(StreamError::UnexpectedEof {
                needed: len,
                remaining: self.buf.remaining(),
            });
        }
        Ok(self.buf.split_to(len))
    }
}

/// [`StreamOutput`] collecting into a growable buffer.
#[derive(Debug, Default)]
pub struct BytesStreamOutput {
    buf: BytesMut,
}

impl BytesStreamOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl StreamOutput for BytesStreamOutput {
    fn write_u8(&mut self, value: u8) -> Result<(), StreamError> {
        self.buf.put_u8(value);
        Ok(())
    }

    fn write_bytes(&mut self, value: &[u8]) -> Result<(), StreamError> {
        self.buf.put_slice(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, &[0x00])]
    #[case(127, &[0x7F])]
    #[case(128, &[0x80, 0x01])]
    #[case(300, &[0xAC, 0x02])]
    #[case(u32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F])]
    fn vint_layout(#[case] value: u32, #[case] expected: &[u8]) {
        let mut out = BytesStreamOutput::new();
        out.write_vint(value).unwrap();
        let bytes = out.freeze();
        assert_eq!(&bytes[..], expected);
        assert_eq!(BytesStreamInput::new(bytes).read_vint().unwrap(), value);
    }

    #[test]
    fn overlong_vint_is_rejected() {
        let mut input = BytesStreamInput::new(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x1F]);
        assert!(matches!(input.read_vint(), Err(StreamError::VIntTooLong)));
    }

    #[test]
    fn length_prefix_is_a_vint() {
        let mut out = BytesStreamOutput::new();
        out.write_len(300).unwrap();
        assert_eq!(&out.freeze()[..], &[0xAC, 0x02]);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn length_beyond_u32_is_rejected_before_writing() {
        let mut out = BytesStreamOutput::new();
        let len = u32::MAX as usize + 1;
        assert!(matches!(
            out.write_len(len),
            Err(StreamError::LengthOverflow(n)) if n == len
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn string_is_length_prefixed_utf8() {
        let mut out = BytesStreamOutput::new();
        out.write_string("héllo").unwrap();
        let bytes = out.freeze();
        assert_eq!(bytes[0] as usize, "héllo".len());

        let mut input = BytesStreamInput::new(bytes);
        assert_eq!(input.read_string().unwrap(), "héllo");
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn truncated_string_reports_eof() {
        let mut input = BytesStreamInput::new(vec![0x05, b'a', b'b']);
        assert!(matches!(
            input.read_string(),
            Err(StreamError::UnexpectedEof { needed: 5, remaining: 2 })
        ));
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut input = BytesStreamInput::new(vec![0x02, 0xC3, 0x28]);
        assert!(matches!(input.read_string(), Err(StreamError::InvalidUtf8(_))));
    }

    #[test]
    fn bool_must_be_zero_or_one() {
        let mut input = BytesStreamInput::new(vec![0x01, 0x00, 0x02]);
        assert!(input.read_bool().unwrap());
        assert!(!input.read_bool().unwrap());
        assert!(matches!(input.read_bool(), Err(StreamError::InvalidBool(2))));
    }

    #[test]
    fn mixed_values_read_back_in_order() {
        let mut out = BytesStreamOutput::new();
        out.write_i64(-42).unwrap();
        out.write_optional_string(None).unwrap();
        out.write_optional_string(Some("x")).unwrap();
        out.write_string_list(&["a".to_string(), "b".to_string()]).unwrap();

        let mut input = BytesStreamInput::new(out.freeze());
        assert_eq!(input.read_i64().unwrap(), -42);
        assert_eq!(input.read_optional_string().unwrap(), None);
        assert_eq!(input.read_optional_string().unwrap().as_deref(), Some("x"));
        assert_eq!(input.read_string_list().unwrap(), vec!["a", "b"]);
        assert!(matches!(input.read_u8(), Err(StreamError::UnexpectedEof { .. })));
    }
}
