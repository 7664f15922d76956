//! Core type definitions for ledger transactions.
//!
//! The vocabulary shared by every transaction variant: the type
//! discriminator, memos, signer-list entries, and the multi-sign
//! contribution each signer hands back.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::codec::object::FromField;
use crate::codec::{CodecError, FieldId, FieldValue, StObject};
use crate::crypto::PublicKey;
use crate::identity::AccountId;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

macro_rules! transaction_types {
    ($( $variant:ident = $code:literal ),* $(,)?) => {
        /// Discriminant written into the `TransactionType` field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum TransactionType {
            $( $variant, )*
        }

        impl TransactionType {
            /// Every supported type, in code order.
            pub const ALL: &'static [TransactionType] = &[ $( TransactionType::$variant, )* ];

            /// The 16-bit code on the wire.
            pub fn code(self) -> u16 {
                match self {
                    $( TransactionType::$variant => $code, )*
                }
            }

            pub fn from_code(code: u16) -> Result<Self, CodecError> {
                match code {
                    $( $code => Ok(TransactionType::$variant), )*
                    other => Err(CodecError::UnknownTransactionType(other)),
                }
            }

            /// Name used in the JSON form.
            pub fn name(self) -> &'static str {
                match self {
                    $( TransactionType::$variant => stringify!($variant), )*
                }
            }
        }
    };
}

transaction_types! {
    Payment = 0,
    EscrowCreate = 1,
    EscrowFinish = 2,
    AccountSet = 3,
    EscrowCancel = 4,
    SetRegularKey = 5,
    OfferCreate = 7,
    OfferCancel = 8,
    SignerListSet = 12,
    PaymentChannelCreate = 13,
    PaymentChannelFund = 14,
    PaymentChannelClaim = 15,
    CheckCreate = 16,
    CheckCash = 17,
    CheckCancel = 18,
    TrustSet = 20,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

/// Free-form data attached to a transaction. Each part is optional and
/// opaque to the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    #[serde(default, with = "opt_hex_bytes")]
    pub memo_type: Option<Vec<u8>>,
    #[serde(default, with = "opt_hex_bytes")]
    pub memo_data: Option<Vec<u8>>,
    #[serde(default, with = "opt_hex_bytes")]
    pub memo_format: Option<Vec<u8>>,
}

impl Memo {
    /// A memo with UTF-8 text in each part.
    pub fn from_text(memo_type: &str, memo_data: &str, memo_format: &str) -> Self {
        let part = |s: &str| (!s.is_empty()).then(|| s.as_bytes().to_vec());
        Self {
            memo_type: part(memo_type),
            memo_data: part(memo_data),
            memo_format: part(memo_format),
        }
    }

    pub(crate) fn to_object(&self) -> StObject {
        let mut object = StObject::new();
        object.set_opt(FieldId::MEMO_TYPE, self.memo_type.clone());
        object.set_opt(FieldId::MEMO_DATA, self.memo_data.clone());
        object.set_opt(FieldId::MEMO_FORMAT, self.memo_format.clone());
        object
    }

    pub(crate) fn from_object(mut object: StObject) -> Result<Self, CodecError> {
        let memo = Self {
            memo_type: object.take_opt(FieldId::MEMO_TYPE)?,
            memo_data: object.take_opt(FieldId::MEMO_DATA)?,
            memo_format: object.take_opt(FieldId::MEMO_FORMAT)?,
        };
        object.ensure_consumed()?;
        Ok(memo)
    }
}

// ---------------------------------------------------------------------------
// SignerEntry
// ---------------------------------------------------------------------------

/// One member of an account's signer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerEntry {
    pub account: AccountId,
    pub signer_weight: u16,
}

impl SignerEntry {
    pub fn new(account: AccountId, signer_weight: u16) -> Self {
        Self {
            account,
            signer_weight,
        }
    }

    pub(crate) fn to_object(&self) -> StObject {
        let mut object = StObject::new();
        object.set(FieldId::ACCOUNT, self.account);
        object.set(FieldId::SIGNER_WEIGHT, self.signer_weight);
        object
    }

    pub(crate) fn from_object(mut object: StObject) -> Result<Self, CodecError> {
        let entry = Self {
            account: object.take(FieldId::ACCOUNT)?,
            signer_weight: object.take(FieldId::SIGNER_WEIGHT)?,
        };
        object.ensure_consumed()?;
        Ok(entry)
    }
}

// ---------------------------------------------------------------------------
// MultiSignEntry
// ---------------------------------------------------------------------------

/// One signer's contribution to a multi-signed transaction.
///
/// Produced independently by each signer against the same unsigned base,
/// then merged. Serializes as a `Signer` object inside the `Signers` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSignEntry {
    pub account: AccountId,
    pub signing_pub_key: PublicKey,
    #[serde(with = "hex_bytes")]
    pub txn_signature: Vec<u8>,
}

impl MultiSignEntry {
    pub(crate) fn to_object(&self) -> StObject {
        let mut object = StObject::new();
        object.set(FieldId::ACCOUNT, self.account);
        object.set(FieldId::SIGNING_PUB_KEY, self.signing_pub_key);
        object.set(FieldId::TXN_SIGNATURE, self.txn_signature.clone());
        object
    }

    pub(crate) fn from_object(mut object: StObject) -> Result<Self, CodecError> {
        let entry = Self {
            account: object.take(FieldId::ACCOUNT)?,
            signing_pub_key: object.take(FieldId::SIGNING_PUB_KEY)?,
            txn_signature: object.take(FieldId::TXN_SIGNATURE)?,
        };
        object.ensure_consumed()?;
        Ok(entry)
    }
}

// ---------------------------------------------------------------------------
// Field conversions
// ---------------------------------------------------------------------------

impl From<PublicKey> for FieldValue {
    fn from(key: PublicKey) -> Self {
        FieldValue::Blob(key.as_bytes().to_vec())
    }
}

impl FromField for PublicKey {
    fn from_field(field: FieldId, value: FieldValue) -> Result<Self, CodecError> {
        let bytes: Vec<u8> = FromField::from_field(field, value)?;
        PublicKey::from_slice(&bytes).map_err(|e| CodecError::InvalidValue {
            field: field.name(),
            reason: e.to_string(),
        })
    }
}

/// Wrap objects into an array under a common element field.
pub(crate) fn to_array<T>(
    element: FieldId,
    items: &[T],
    to_object: impl Fn(&T) -> StObject,
) -> FieldValue {
    FieldValue::Array(items.iter().map(|item| (element, to_object(item))).collect())
}

/// Unwrap an array, checking each element carries the expected field.
pub(crate) fn from_array<T>(
    element: FieldId,
    items: Vec<(FieldId, StObject)>,
    from_object: impl Fn(StObject) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    items
        .into_iter()
        .map(|(field, object)| {
            if field != element {
                return Err(CodecError::UnexpectedField(field.name()));
            }
            from_object(object)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

mod hex_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

mod opt_hex_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&hex::encode_upper(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
