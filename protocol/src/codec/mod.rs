//! # Canonical Binary Codec
//!
//! Everything the ledger hashes or verifies goes through this module. The
//! rules are fixed by the network and must be reproduced byte for byte:
//!
//! - [`field`]: `(type code, nth)` identifiers, header encoding, the registry
//! - [`binary`]: integer and length-prefix primitives
//! - [`types`], [`amount`], [`path`]: value encodings
//! - [`object`]: canonical ordered objects, signing and full encodings
//! - [`json`]: the network's JSON rendering
//!
//! Encoding is a pure function of the object: no clocks, no randomness, no
//! dependence on insertion order.

pub mod amount;
pub mod binary;
pub mod field;
pub mod json;
pub mod object;
pub mod path;
pub mod types;

use thiserror::Error;

pub use amount::{Amount, Currency, IssuedAmount, IssuedValue};
pub use binary::{BinaryParser, BinaryWriter};
pub use field::{FieldId, TypeCode};
pub use object::{EncodeMode, FieldValue, StObject};
pub use path::{Path, PathSet, PathStep};
pub use types::{Hash128, Hash256};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Serialization and deserialization failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unknown type code {0}")]
    UnknownTypeCode(u8),

    /// A `(type, nth)` pair with no registered field.
    #[error("unknown field (type {type_code}, nth {nth})")]
    UnknownField { type_code: u8, nth: u8 },

    /// Variable-length payload above the 918744-byte ceiling.
    #[error("field of {length} bytes exceeds the maximum of {max}")]
    FieldTooLong { length: usize, max: usize },

    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid length prefix byte {0:#04x}")]
    InvalidLengthPrefix(u8),

    /// A field header written in a longer form than necessary.
    #[error("non-canonical field header")]
    NonCanonicalHeader,

    #[error("field {0} is out of canonical order")]
    NonCanonicalOrder(&'static str),

    #[error("field {0} appears more than once")]
    DuplicateField(&'static str),

    #[error("field {field} must hold a {expected:?} value")]
    TypeMismatch {
        field: &'static str,
        expected: TypeCode,
    },

    #[error("missing required field {0}")]
    MissingField(&'static str),

    /// A known field that the decoded transaction variant does not use.
    #[error("field {0} does not belong here")]
    UnexpectedField(&'static str),

    #[error("unknown transaction type {0}")]
    UnknownTransactionType(u16),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("objects nested too deeply")]
    TooDeep,
}
