//! Low-level byte reader/writer: fixed-width integers, variable-length
//! prefixes and field headers.
//!
//! ## Length prefix
//!
//! ```text
//! length            bytes  encoding
//! 0 ..= 192         1      [len]
//! 193 ..= 12480     2      [193 + (l >> 8), l & 0xFF]               l = len - 193
//! 12481 ..= 918744  3      [241 + (l >> 16), (l >> 8) & 0xFF, l & 0xFF]   l = len - 12481
//! ```

use super::field::{FieldId, TypeCode};
use super::CodecError;
use crate::config::MAX_VL_LENGTH;

/// Encode a variable-length prefix.
pub fn encode_vl_length(length: usize) -> Result<Vec<u8>, CodecError> {
    if length <= 192 {
        Ok(vec![length as u8])
    } else if length <= 12_480 {
        let l = length - 193;
        Ok(vec![193 + (l >> 8) as u8, (l & 0xFF) as u8])
    } else if length <= MAX_VL_LENGTH {
        let l = length - 12_481;
        Ok(vec![
            241 + (l >> 16) as u8,
            ((l >> 8) & 0xFF) as u8,
            (l & 0xFF) as u8,
        ])
    } else {
        Err(CodecError::FieldTooLong {
            length,
            max: MAX_VL_LENGTH,
        })
    }
}

/// Append-only output buffer.
#[derive(Debug, Default)]
pub struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Length prefix followed by the bytes themselves.
    pub fn write_vl(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let prefix = encode_vl_length(bytes.len())?;
        self.buf.extend_from_slice(&prefix);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_field_header(&mut self, field: FieldId) {
        field.write_header(&mut self.buf);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over borrowed input. Every read is bounds-checked and reports
/// truncation as [`CodecError::UnexpectedEof`].
#[derive(Debug)]
pub struct BinaryParser<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Decode a variable-length prefix.
    pub fn read_vl_length(&mut self) -> Result<usize, CodecError> {
        let b1 = self.read_u8()? as usize;
        match b1 {
            0..=192 => Ok(b1),
            193..=240 => {
                let b2 = self.read_u8()? as usize;
                Ok(193 + ((b1 - 193) << 8) + b2)
            }
            241..=254 => {
                let b2 = self.read_u8()? as usize;
                let b3 = self.read_u8()? as usize;
                let length = 12_481 + ((b1 - 241) << 16) + (b2 << 8) + b3;
                if length > MAX_VL_LENGTH {
                    return Err(CodecError::FieldTooLong {
                        length,
                        max: MAX_VL_LENGTH,
                    });
                }
                Ok(length)
            }
            _ => Err(CodecError::InvalidLengthPrefix(b1 as u8)),
        }
    }

    /// Length prefix plus payload.
    pub fn read_vl(&mut self) -> Result<&'a [u8], CodecError> {
        let length = self.read_vl_length()?;
        self.read_bytes(length)
    }

    /// Read a field header. Codes that should have been packed into the
    /// short form are rejected as non-canonical.
    pub fn read_field_id(&mut self) -> Result<FieldId, CodecError> {
        let first = self.read_u8()?;
        let high = first >> 4;
        let low = first & 0x0F;

        let (type_code, nth) = match (high, low) {
            (0, 0) => (self.read_u8()?, self.read_u8()?),
            (0, low) => (self.read_u8()?, low),
            (high, 0) => (high, self.read_u8()?),
            (high, low) => (high, low),
        };

        if (high == 0 && type_code < 16) || (low == 0 && nth < 16) {
            return Err(CodecError::NonCanonicalHeader);
        }

        Ok(FieldId::new(TypeCode::from_u8(type_code)?, nth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vl_length_boundaries() {
        assert_eq!(encode_vl_length(0).unwrap(), vec![0x00]);
        assert_eq!(encode_vl_length(192).unwrap(), vec![0xC0]);
        assert_eq!(encode_vl_length(193).unwrap(), vec![0xC1, 0x00]);
        assert_eq!(encode_vl_length(12_480).unwrap(), vec![0xF0, 0xFF]);
        assert_eq!(encode_vl_length(12_481).unwrap(), vec![0xF1, 0x00, 0x00]);
        assert_eq!(encode_vl_length(918_744).unwrap(), vec![0xFE, 0xD4, 0x17]);
    }

    #[test]
    fn test_vl_length_over_max_rejected() {
        let mut parser = BinaryParser::new(&[0xFE, 0xD4, 0x17]);
        assert_eq!(parser.read_vl_length().unwrap(), MAX_VL_LENGTH);

        let mut parser = BinaryParser::new(&[0xFE, 0xD4, 0x18]);
        assert_eq!(
            parser.read_vl_length(),
            Err(CodecError::FieldTooLong {
                length: 918_745,
                max: MAX_VL_LENGTH,
            })
        );

        let mut parser = BinaryParser::new(&[0xFE, 0xFF, 0xFF]);
        assert!(matches!(
            parser.read_vl_length(),
            Err(CodecError::FieldTooLong { .. })
        ));
    }

    #[test]
    fn test_vl_length_too_long() {
        assert!(matches!(
            encode_vl_length(918_745),
            Err(CodecError::FieldTooLong { length: 918_745, .. })
        ));
    }

    #[test]
    fn test_vl_length_decodes_back() {
        for length in [0usize, 1, 192, 193, 500, 12_480, 12_481, 100_000, 918_744] {
            let prefix = encode_vl_length(length).unwrap();
            let mut parser = BinaryParser::new(&prefix);
            assert_eq!(parser.read_vl_length().unwrap(), length, "length {}", length);
            assert!(parser.is_empty());
        }
    }

    #[test]
    fn test_vl_length_reserved_byte() {
        let mut parser = BinaryParser::new(&[0xFF, 0, 0]);
        assert!(matches!(
            parser.read_vl_length(),
            Err(CodecError::InvalidLengthPrefix(0xFF))
        ));
    }

    #[test]
    fn test_truncated_read() {
        let mut parser = BinaryParser::new(&[0x01, 0x02]);
        assert!(matches!(
            parser.read_u32(),
            Err(CodecError::UnexpectedEof { needed: 4, remaining: 2 })
        ));
    }

    #[test]
    fn test_vl_payload_truncated() {
        let mut parser = BinaryParser::new(&[0x05, 0xAA, 0xBB]);
        assert!(matches!(parser.read_vl(), Err(CodecError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_field_header_roundtrip() {
        for field in [
            FieldId::ACCOUNT,
            FieldId::LAST_LEDGER_SEQUENCE,
            FieldId::PATHS,
            FieldId::TICK_SIZE,
            FieldId::SIGNER,
        ] {
            let mut writer = BinaryWriter::new();
            writer.write_field_header(field);
            let bytes = writer.into_bytes();
            let mut parser = BinaryParser::new(&bytes);
            assert_eq!(parser.read_field_id().unwrap(), field);
            assert!(parser.is_empty());
        }
    }

    #[test]
    fn test_non_canonical_header_rejected() {
        // Sequence (2, 4) written in the long form.
        let mut parser = BinaryParser::new(&[0x20, 0x04]);
        assert!(matches!(
            parser.read_field_id(),
            Err(CodecError::NonCanonicalHeader)
        ));
    }

    #[test]
    fn test_unknown_type_code_in_header() {
        let mut parser = BinaryParser::new(&[0x91]);
        assert!(matches!(
            parser.read_field_id(),
            Err(CodecError::UnknownTypeCode(9))
        ));
    }
}
