//! # Serialized Objects
//!
//! [`StObject`] is a map from [`FieldId`] to [`FieldValue`]. Because the map
//! is ordered by `(type code, nth)`, iteration order *is* canonical order:
//! it does not matter in which order fields were set, the bytes come out
//! the same.
//!
//! Encoding comes in two flavours. [`EncodeMode::All`] writes everything
//! (the submitted blob and the identity hash). [`EncodeMode::Signing`] drops
//! the top-level fields that signatures cannot cover (`TxnSignature`,
//! `Signers`). Nested objects always encode every field.
//!
//! Decoding is strict. Unknown fields, truncated values, out-of-order or
//! repeated fields, and values of the wrong type are all errors. Nothing is
//! skipped or defaulted.

use std::collections::BTreeMap;

use super::amount::Amount;
use super::binary::{BinaryParser, BinaryWriter};
use super::field::{FieldId, TypeCode};
use super::path::PathSet;
use super::types::{Hash128, Hash256};
use super::CodecError;
use crate::identity::AccountId;

/// Ends an inner object.
pub const OBJECT_END_MARKER: u8 = 0xE1;
/// Ends an array.
pub const ARRAY_END_MARKER: u8 = 0xF1;

/// Nesting deeper than this is rejected on decode.
const MAX_DEPTH: usize = 10;

/// Which fields an encoding includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    All,
    Signing,
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128(Hash128),
    Hash256(Hash256),
    Amount(Amount),
    Blob(Vec<u8>),
    Account(AccountId),
    Object(StObject),
    /// Array elements are objects wrapped in their own field header.
    Array(Vec<(FieldId, StObject)>),
    PathSet(PathSet),
}

impl FieldValue {
    pub fn type_code(&self) -> TypeCode {
        match self {
            FieldValue::UInt8(_) => TypeCode::UInt8,
            FieldValue::UInt16(_) => TypeCode::UInt16,
            FieldValue::UInt32(_) => TypeCode::UInt32,
            FieldValue::UInt64(_) => TypeCode::UInt64,
            FieldValue::Hash128(_) => TypeCode::Hash128,
            FieldValue::Hash256(_) => TypeCode::Hash256,
            FieldValue::Amount(_) => TypeCode::Amount,
            FieldValue::Blob(_) => TypeCode::Blob,
            FieldValue::Account(_) => TypeCode::AccountId,
            FieldValue::Object(_) => TypeCode::Object,
            FieldValue::Array(_) => TypeCode::Array,
            FieldValue::PathSet(_) => TypeCode::PathSet,
        }
    }

    fn write(&self, writer: &mut BinaryWriter) -> Result<(), CodecError> {
        match self {
            FieldValue::UInt8(v) => writer.write_u8(*v),
            FieldValue::UInt16(v) => writer.write_u16(*v),
            FieldValue::UInt32(v) => writer.write_u32(*v),
            FieldValue::UInt64(v) => writer.write_u64(*v),
            FieldValue::Hash128(h) => writer.write_bytes(h.as_bytes()),
            FieldValue::Hash256(h) => writer.write_bytes(h.as_bytes()),
            FieldValue::Amount(a) => a.write(writer)?,
            FieldValue::Blob(b) => writer.write_vl(b)?,
            FieldValue::Account(a) => writer.write_vl(a.as_bytes())?,
            FieldValue::Object(o) => {
                o.write_fields(writer, EncodeMode::All)?;
                writer.write_u8(OBJECT_END_MARKER);
            }
            FieldValue::Array(items) => {
                for (field, object) in items {
                    if field.type_code != TypeCode::Object {
                        return Err(CodecError::TypeMismatch {
                            field: field.name(),
                            expected: TypeCode::Object,
                        });
                    }
                    writer.write_field_header(*field);
                    object.write_fields(writer, EncodeMode::All)?;
                    writer.write_u8(OBJECT_END_MARKER);
                }
                writer.write_u8(ARRAY_END_MARKER);
            }
            FieldValue::PathSet(p) => p.write(writer)?,
        }
        Ok(())
    }

    fn read(
        field: FieldId,
        parser: &mut BinaryParser<'_>,
        depth: usize,
    ) -> Result<Self, CodecError> {
        Ok(match field.type_code {
            TypeCode::UInt8 => FieldValue::UInt8(parser.read_u8()?),
            TypeCode::UInt16 => FieldValue::UInt16(parser.read_u16()?),
            TypeCode::UInt32 => FieldValue::UInt32(parser.read_u32()?),
            TypeCode::UInt64 => FieldValue::UInt64(parser.read_u64()?),
            TypeCode::Hash128 => FieldValue::Hash128(Hash128(parser.read_array()?)),
            TypeCode::Hash256 => FieldValue::Hash256(Hash256(parser.read_array()?)),
            TypeCode::Amount => FieldValue::Amount(Amount::read(parser)?),
            TypeCode::Blob => FieldValue::Blob(parser.read_vl()?.to_vec()),
            TypeCode::AccountId => {
                let bytes = parser.read_vl()?;
                let account = AccountId::from_slice(bytes).map_err(|_| CodecError::InvalidValue {
                    field: field.name(),
                    reason: format!("account id must be 20 bytes, got {}", bytes.len()),
                })?;
                FieldValue::Account(account)
            }
            TypeCode::Object => FieldValue::Object(StObject::read_inner(parser, depth + 1)?),
            TypeCode::Array => FieldValue::Array(read_array(parser, depth + 1)?),
            TypeCode::PathSet => FieldValue::PathSet(PathSet::read(parser)?),
            TypeCode::Hash160 | TypeCode::Vector256 => {
                return Err(CodecError::UnknownField {
                    type_code: field.type_code as u8,
                    nth: field.nth,
                })
            }
        })
    }
}

fn read_array(
    parser: &mut BinaryParser<'_>,
    depth: usize,
) -> Result<Vec<(FieldId, StObject)>, CodecError> {
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDeep);
    }
    let mut items = Vec::new();
    loop {
        match parser.peek() {
            Some(ARRAY_END_MARKER) => {
                parser.read_u8()?;
                return Ok(items);
            }
            None => {
                return Err(CodecError::UnexpectedEof {
                    needed: 1,
                    remaining: 0,
                })
            }
            Some(_) => {
                let field = read_known_field(parser)?;
                if field.type_code != TypeCode::Object {
                    return Err(CodecError::TypeMismatch {
                        field: field.name(),
                        expected: TypeCode::Object,
                    });
                }
                items.push((field, StObject::read_inner(parser, depth + 1)?));
            }
        }
    }
}

fn read_known_field(parser: &mut BinaryParser<'_>) -> Result<FieldId, CodecError> {
    let field = parser.read_field_id()?;
    if field.definition().is_none() {
        return Err(CodecError::UnknownField {
            type_code: field.type_code as u8,
            nth: field.nth,
        });
    }
    Ok(field)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! field_conversions {
    ($( $ty:ty => $variant:ident / $code:ident ),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }

            impl FromField for $ty {
                fn from_field(field: FieldId, value: FieldValue) -> Result<Self, CodecError> {
                    match value {
                        FieldValue::$variant(v) => Ok(v),
                        _ => Err(CodecError::TypeMismatch {
                            field: field.name(),
                            expected: TypeCode::$code,
                        }),
                    }
                }
            }
        )*
    };
}

/// Typed extraction from a [`FieldValue`].
pub trait FromField: Sized {
    fn from_field(field: FieldId, value: FieldValue) -> Result<Self, CodecError>;
}

field_conversions! {
    u8 => UInt8 / UInt8,
    u16 => UInt16 / UInt16,
    u32 => UInt32 / UInt32,
    u64 => UInt64 / UInt64,
    Hash128 => Hash128 / Hash128,
    Hash256 => Hash256 / Hash256,
    Amount => Amount / Amount,
    Vec<u8> => Blob / Blob,
    AccountId => Account / AccountId,
    StObject => Object / Object,
    Vec<(FieldId, StObject)> => Array / Array,
    PathSet => PathSet / PathSet,
}

// ---------------------------------------------------------------------------
// StObject
// ---------------------------------------------------------------------------

/// A canonical, ordered set of fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StObject {
    fields: BTreeMap<FieldId, FieldValue>,
}

impl StObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, field: FieldId, value: impl Into<FieldValue>) {
        self.fields.insert(field, value.into());
    }

    /// Set a field only when `value` is `Some`. Absent optionals are
    /// omitted from the encoding entirely.
    pub fn set_opt<T: Into<FieldValue>>(&mut self, field: FieldId, value: Option<T>) {
        if let Some(value) = value {
            self.set(field, value);
        }
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn remove(&mut self, field: FieldId) -> Option<FieldValue> {
        self.fields.remove(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &FieldValue)> {
        self.fields.iter()
    }

    /// Remove a required field and convert it.
    pub fn take<T: FromField>(&mut self, field: FieldId) -> Result<T, CodecError> {
        let value = self
            .fields
            .remove(&field)
            .ok_or(CodecError::MissingField(field.name()))?;
        T::from_field(field, value)
    }

    /// Remove an optional field and convert it.
    pub fn take_opt<T: FromField>(&mut self, field: FieldId) -> Result<Option<T>, CodecError> {
        self.fields
            .remove(&field)
            .map(|value| T::from_field(field, value))
            .transpose()
    }

    /// Fail if any field is left over after a typed decode took what it
    /// understands.
    pub fn ensure_consumed(&self) -> Result<(), CodecError> {
        match self.fields.keys().next() {
            Some(field) => Err(CodecError::UnexpectedField(field.name())),
            None => Ok(()),
        }
    }

    /// Encode to bytes.
    pub fn encode(&self, mode: EncodeMode) -> Result<Vec<u8>, CodecError> {
        let mut writer = BinaryWriter::new();
        self.write_fields(&mut writer, mode)?;
        Ok(writer.into_bytes())
    }

    fn write_fields(&self, writer: &mut BinaryWriter, mode: EncodeMode) -> Result<(), CodecError> {
        for (field, value) in &self.fields {
            if mode == EncodeMode::Signing && !field.is_signing() {
                continue;
            }
            if value.type_code() != field.type_code {
                return Err(CodecError::TypeMismatch {
                    field: field.name(),
                    expected: field.type_code,
                });
            }
            writer.write_field_header(*field);
            value.write(writer)?;
        }
        Ok(())
    }

    /// Decode a top-level object that runs to the end of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut parser = BinaryParser::new(bytes);
        let mut object = StObject::new();
        let mut last: Option<FieldId> = None;

        while !parser.is_empty() {
            let field = read_known_field(&mut parser)?;
            check_order(last, field)?;
            let value = FieldValue::read(field, &mut parser, 0)?;
            object.fields.insert(field, value);
            last = Some(field);
        }
        Ok(object)
    }

    fn read_inner(parser: &mut BinaryParser<'_>, depth: usize) -> Result<Self, CodecError> {
        if depth > MAX_DEPTH {
            return Err(CodecError::TooDeep);
        }
        let mut object = StObject::new();
        let mut last: Option<FieldId> = None;

        loop {
            match parser.peek() {
                Some(OBJECT_END_MARKER) => {
                    parser.read_u8()?;
                    return Ok(object);
                }
                None => {
                    return Err(CodecError::UnexpectedEof {
                        needed: 1,
                        remaining: 0,
                    })
                }
                Some(_) => {
                    let field = read_known_field(parser)?;
                    check_order(last, field)?;
                    let value = FieldValue::read(field, parser, depth)?;
                    object.fields.insert(field, value);
                    last = Some(field);
                }
            }
        }
    }
}

fn check_order(last: Option<FieldId>, field: FieldId) -> Result<(), CodecError> {
    match last {
        Some(prev) if prev == field => Err(CodecError::DuplicateField(field.name())),
        Some(prev) if prev > field => Err(CodecError::NonCanonicalOrder(field.name())),
        _ => Ok(()),
    }
}
