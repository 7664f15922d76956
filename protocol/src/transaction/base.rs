//! # Transaction Shapes
//!
//! Two shapes share one set of common fields and one variant enum:
//!
//! - [`Transaction`] carries a single `SigningPubKey` and `TxnSignature`.
//! - [`MultiSignTransaction`] carries a `Signers` list instead. Its
//!   `SigningPubKey` is always present and always empty; that empty field is
//!   how the network recognizes a multi-signed payload.
//!
//! Both implement [`SignableTransaction`], the capability surface the
//! hashing, signing and submission code works against.
//!
//! The caller owns the value. Signing only fills in the public key,
//! signature, signer list and hash.

use serde_json::{json, Value};
use std::cmp::Ordering;

use super::hashing::{identity_hash, HashPrefix};
use super::kinds::TransactionKind;
use super::types::{from_array, to_array, Memo, MultiSignEntry, TransactionType};
use crate::codec::{Amount, CodecError, EncodeMode, FieldId, Hash256, StObject};
use crate::config::MAX_MULTI_SIGNERS;
use crate::crypto::PublicKey;
use crate::identity::AccountId;

// ---------------------------------------------------------------------------
// Common fields
// ---------------------------------------------------------------------------

/// Fields every transaction carries, whatever its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCommon {
    /// The sending account.
    pub account: AccountId,
    /// The account's next sequence number, supplied by the caller.
    pub sequence: u32,
    /// Fee in drops.
    pub fee: u64,
    pub flags: Option<u32>,
    pub source_tag: Option<u32>,
    pub account_txn_id: Option<Hash256>,
    pub last_ledger_sequence: Option<u32>,
    pub memos: Vec<Memo>,
    pub previous_txn_id: Option<Hash256>,
}

impl TransactionCommon {
    pub fn new(account: AccountId, sequence: u32, fee: u64) -> Self {
        Self {
            account,
            sequence,
            fee,
            flags: None,
            source_tag: None,
            account_txn_id: None,
            last_ledger_sequence: None,
            memos: Vec::new(),
            previous_txn_id: None,
        }
    }

    fn write(&self, object: &mut StObject) {
        object.set(FieldId::ACCOUNT, self.account);
        object.set(FieldId::SEQUENCE, self.sequence);
        object.set(FieldId::FEE, Amount::Native(self.fee));
        object.set_opt(FieldId::FLAGS, self.flags);
        object.set_opt(FieldId::SOURCE_TAG, self.source_tag);
        object.set_opt(FieldId::ACCOUNT_TXN_ID, self.account_txn_id);
        object.set_opt(FieldId::LAST_LEDGER_SEQUENCE, self.last_ledger_sequence);
        object.set_opt(FieldId::PREVIOUS_TXN_ID, self.previous_txn_id);
        if !self.memos.is_empty() {
            object.set(
                FieldId::MEMOS,
                to_array(FieldId::MEMO, &self.memos, Memo::to_object),
            );
        }
    }

    fn read(object: &mut StObject) -> Result<Self, CodecError> {
        let fee = match object.take::<Amount>(FieldId::FEE)? {
            Amount::Native(drops) => drops,
            Amount::Issued(_) => {
                return Err(CodecError::InvalidValue {
                    field: "Fee",
                    reason: "fee must be a native amount".into(),
                })
            }
        };
        let memos = match object.take_opt::<Vec<(FieldId, StObject)>>(FieldId::MEMOS)? {
            Some(items) => from_array(FieldId::MEMO, items, Memo::from_object)?,
            None => Vec::new(),
        };
        Ok(Self {
            account: object.take(FieldId::ACCOUNT)?,
            sequence: object.take(FieldId::SEQUENCE)?,
            fee,
            flags: object.take_opt(FieldId::FLAGS)?,
            source_tag: object.take_opt(FieldId::SOURCE_TAG)?,
            account_txn_id: object.take_opt(FieldId::ACCOUNT_TXN_ID)?,
            last_ledger_sequence: object.take_opt(FieldId::LAST_LEDGER_SEQUENCE)?,
            memos,
            previous_txn_id: object.take_opt(FieldId::PREVIOUS_TXN_ID)?,
        })
    }
}

/// Shared decode prefix: the type, the common fields and the variant's
/// fields. Whatever the caller does not take from the returned object
/// afterwards is rejected.
fn decode_parts(bytes: &[u8]) -> Result<(StObject, TransactionCommon, TransactionKind), CodecError> {
    let mut object = StObject::decode(bytes)?;
    let code: u16 = object.take(FieldId::TRANSACTION_TYPE)?;
    let transaction_type = TransactionType::from_code(code)?;
    let common = TransactionCommon::read(&mut object)?;
    let kind = TransactionKind::read_fields(transaction_type, &mut object)?;
    Ok((object, common, kind))
}

fn base_object(common: &TransactionCommon, kind: &TransactionKind) -> StObject {
    let mut object = StObject::new();
    object.set(FieldId::TRANSACTION_TYPE, kind.transaction_type().code());
    common.write(&mut object);
    kind.write_fields(&mut object);
    object
}

// ---------------------------------------------------------------------------
// Capability surface
// ---------------------------------------------------------------------------

/// What hashing, signing and submission need from either shape.
pub trait SignableTransaction {
    fn common(&self) -> &TransactionCommon;

    fn kind(&self) -> &TransactionKind;

    /// Prefix of the digest a signer signs.
    fn signing_prefix(&self) -> HashPrefix;

    /// The single signer's key. Always `None` for multi-signed transactions.
    fn public_key(&self) -> Option<&PublicKey>;

    /// The single signature. Always `None` for multi-signed transactions.
    fn signature(&self) -> Option<&[u8]>;

    /// The signer list. Always empty for single-signed transactions.
    fn signers(&self) -> &[MultiSignEntry];

    /// Identity hash, set once signing has completed.
    fn hash(&self) -> Option<&Hash256>;

    fn set_hash(&mut self, hash: Hash256);

    /// Reset the signature slots before a fresh signing pass.
    fn initialize_for_signing(&mut self);

    /// The full field set, signature fields included.
    fn to_object(&self) -> StObject;

    fn transaction_type(&self) -> TransactionType {
        self.kind().transaction_type()
    }

    /// The submitted blob.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        self.to_object().encode(EncodeMode::All)
    }

    /// The bytes signatures cover: no `TxnSignature`, no `Signers`.
    fn encode_for_signing(&self) -> Result<Vec<u8>, CodecError> {
        self.to_object().encode(EncodeMode::Signing)
    }

    fn to_hex(&self) -> Result<String, CodecError> {
        Ok(hex::encode_upper(self.encode()?))
    }

    /// The network's JSON form (`tx_json`), with `hash` once signed.
    fn to_json(&self) -> Value {
        let mut value = self.to_object().to_json();
        if let (Some(hash), Value::Object(map)) = (self.hash(), &mut value) {
            map.insert("hash".into(), json!(hash.to_hex()));
        }
        value
    }
}

/// Order by account, then sequence, then identity hash.
pub fn compare_transactions<A, B>(a: &A, b: &B) -> Ordering
where
    A: SignableTransaction + ?Sized,
    B: SignableTransaction + ?Sized,
{
    a.common()
        .account
        .cmp(&b.common().account)
        .then(a.common().sequence.cmp(&b.common().sequence))
        .then_with(|| a.hash().cmp(&b.hash()))
}

// ---------------------------------------------------------------------------
// Single-signed shape
// ---------------------------------------------------------------------------

/// A transaction signed by one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub common: TransactionCommon,
    pub kind: TransactionKind,
    pub signing_pub_key: Option<PublicKey>,
    pub txn_signature: Option<Vec<u8>>,
    pub hash: Option<Hash256>,
}

impl Transaction {
    pub fn new(common: TransactionCommon, kind: impl Into<TransactionKind>) -> Self {
        Self {
            common,
            kind: kind.into(),
            signing_pub_key: None,
            txn_signature: None,
            hash: None,
        }
    }

    pub fn set_public_key(&mut self, key: PublicKey) {
        self.signing_pub_key = Some(key);
    }

    pub fn set_signature(&mut self, signature: Vec<u8>) {
        self.txn_signature = Some(signature);
    }

    pub fn is_signed(&self) -> bool {
        self.signing_pub_key.is_some() && self.txn_signature.is_some()
    }

    /// Strict decode. A signed blob gets its identity hash recomputed.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let (mut object, common, kind) = decode_parts(bytes)?;

        let signing_pub_key = match object.take_opt::<Vec<u8>>(FieldId::SIGNING_PUB_KEY)? {
            None => None,
            Some(raw) if raw.is_empty() => {
                return Err(CodecError::InvalidValue {
                    field: "SigningPubKey",
                    reason: "empty key marks a multi-signed transaction".into(),
                })
            }
            Some(raw) => Some(PublicKey::from_slice(&raw).map_err(|e| {
                CodecError::InvalidValue {
                    field: "SigningPubKey",
                    reason: e.to_string(),
                }
            })?),
        };
        let txn_signature = object.take_opt(FieldId::TXN_SIGNATURE)?;
        object.ensure_consumed()?;

        let mut tx = Self {
            common,
            kind,
            signing_pub_key,
            txn_signature,
            hash: None,
        };
        if tx.txn_signature.is_some() {
            tx.hash = Some(identity_hash(&tx)?);
        }
        Ok(tx)
    }

    pub fn decode_hex(blob: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(blob).map_err(|e| CodecError::InvalidValue {
            field: "tx_blob",
            reason: e.to_string(),
        })?;
        Self::decode(&bytes)
    }
}

impl SignableTransaction for Transaction {
    fn common(&self) -> &TransactionCommon {
        &self.common
    }

    fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    fn signing_prefix(&self) -> HashPrefix {
        HashPrefix::TransactionSign
    }

    fn public_key(&self) -> Option<&PublicKey> {
        self.signing_pub_key.as_ref()
    }

    fn signature(&self) -> Option<&[u8]> {
        self.txn_signature.as_deref()
    }

    fn signers(&self) -> &[MultiSignEntry] {
        &[]
    }

    fn hash(&self) -> Option<&Hash256> {
        self.hash.as_ref()
    }

    fn set_hash(&mut self, hash: Hash256) {
        self.hash = Some(hash);
    }

    fn initialize_for_signing(&mut self) {
        self.txn_signature = None;
        self.hash = None;
    }

    fn to_object(&self) -> StObject {
        let mut object = base_object(&self.common, &self.kind);
        object.set_opt(FieldId::SIGNING_PUB_KEY, self.signing_pub_key);
        object.set_opt(FieldId::TXN_SIGNATURE, self.txn_signature.clone());
        object
    }
}

// ---------------------------------------------------------------------------
// Multi-signed shape
// ---------------------------------------------------------------------------

/// A transaction authorized by a list of signers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSignTransaction {
    pub common: TransactionCommon,
    pub kind: TransactionKind,
    /// Strictly ascending by account once merged.
    pub signers: Vec<MultiSignEntry>,
    pub hash: Option<Hash256>,
}

impl MultiSignTransaction {
    pub fn new(common: TransactionCommon, kind: impl Into<TransactionKind>) -> Self {
        Self {
            common,
            kind: kind.into(),
            signers: Vec::new(),
            hash: None,
        }
    }

    /// Strict decode. The signer list must be sorted, free of duplicates
    /// and at most eight long.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let (mut object, common, kind) = decode_parts(bytes)?;

        let signing_pub_key: Vec<u8> = object.take(FieldId::SIGNING_PUB_KEY)?;
        if !signing_pub_key.is_empty() {
            return Err(CodecError::InvalidValue {
                field: "SigningPubKey",
                reason: "must be empty on a multi-signed transaction".into(),
            });
        }
        let signers = match object.take_opt::<Vec<(FieldId, StObject)>>(FieldId::SIGNERS)? {
            Some(items) => from_array(FieldId::SIGNER, items, MultiSignEntry::from_object)?,
            None => Vec::new(),
        };
        object.ensure_consumed()?;

        if signers.len() > MAX_MULTI_SIGNERS {
            return Err(CodecError::InvalidValue {
                field: "Signers",
                reason: format!("{} signers, at most {}", signers.len(), MAX_MULTI_SIGNERS),
            });
        }
        if signers.windows(2).any(|w| w[0].account >= w[1].account) {
            return Err(CodecError::InvalidValue {
                field: "Signers",
                reason: "signers must be strictly ascending by account".into(),
            });
        }

        let mut tx = Self {
            common,
            kind,
            signers,
            hash: None,
        };
        if !tx.signers.is_empty() {
            tx.hash = Some(identity_hash(&tx)?);
        }
        Ok(tx)
    }

    pub fn decode_hex(blob: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(blob).map_err(|e| CodecError::InvalidValue {
            field: "tx_blob",
            reason: e.to_string(),
        })?;
        Self::decode(&bytes)
    }
}

impl SignableTransaction for MultiSignTransaction {
    fn common(&self) -> &TransactionCommon {
        &self.common
    }

    fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    fn signing_prefix(&self) -> HashPrefix {
        HashPrefix::MultiSign
    }

    fn public_key(&self) -> Option<&PublicKey> {
        None
    }

    fn signature(&self) -> Option<&[u8]> {
        None
    }

    fn signers(&self) -> &[MultiSignEntry] {
        &self.signers
    }

    fn hash(&self) -> Option<&Hash256> {
        self.hash.as_ref()
    }

    fn set_hash(&mut self, hash: Hash256) {
        self.hash = Some(hash);
    }

    fn initialize_for_signing(&mut self) {
        self.hash = None;
    }

    fn to_object(&self) -> StObject {
        let mut object = base_object(&self.common, &self.kind);
        object.set(FieldId::SIGNING_PUB_KEY, Vec::<u8>::new());
        if !self.signers.is_empty() {
            object.set(
                FieldId::SIGNERS,
                to_array(FieldId::SIGNER, &self.signers, MultiSignEntry::to_object),
            );
        }
        object
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::kinds::{OfferCancel, Payment};

    fn common(account: u8, sequence: u32) -> TransactionCommon {
        TransactionCommon::new(AccountId::from_bytes([account; 20]), sequence, 12)
    }

    fn payment() -> Payment {
        Payment {
            destination: AccountId::from_bytes([0xBB; 20]),
            amount: Amount::Native(1_000_000),
            send_max: None,
            deliver_min: None,
            paths: None,
            destination_tag: None,
            invoice_id: None,
        }
    }

    #[test]
    fn unsigned_payment_bytes() {
        let tx = Transaction::new(common(0xAA, 1), payment());
        let expected = format!(
            "120000{}{}{}8114{}8314{}",
            "2400000001",
            "6140000000000F4240",
            "68400000000000000C",
            "AA".repeat(20),
            "BB".repeat(20),
        );
        assert_eq!(tx.to_hex().unwrap(), expected);
    }

    #[test]
    fn multi_sign_shape_always_has_empty_key() {
        let tx = MultiSignTransaction::new(common(0xAA, 1), payment());
        let bytes = tx.encode_for_signing().unwrap();
        // SigningPubKey header 0x73 followed by a zero length.
        assert!(bytes.windows(2).any(|w| w == [0x73, 0x00]));
        assert_eq!(MultiSignTransaction::decode(&bytes).unwrap(), tx);
    }

    #[test]
    fn single_decode_rejects_multi_blob() {
        let tx = MultiSignTransaction::new(common(0xAA, 1), payment());
        let bytes = tx.encode().unwrap();
        assert!(matches!(
            Transaction::decode(&bytes),
            Err(CodecError::InvalidValue { field: "SigningPubKey", .. })
        ));
    }

    #[test]
    fn foreign_field_rejected() {
        // Payment carrying an OfferSequence.
        let mut object = Transaction::new(common(0xAA, 1), payment()).to_object();
        object.set(FieldId::OFFER_SEQUENCE, 3u32);
        let bytes = object.encode(EncodeMode::All).unwrap();
        assert_eq!(
            Transaction::decode(&bytes),
            Err(CodecError::UnexpectedField("OfferSequence"))
        );
    }

    #[test]
    fn issued_fee_rejected() {
        let mut object = Transaction::new(common(0xAA, 1), payment()).to_object();
        object.set(
            FieldId::FEE,
            Amount::issued("1", "USD", AccountId::default()).unwrap(),
        );
        let bytes = object.encode(EncodeMode::All).unwrap();
        assert!(matches!(
            Transaction::decode(&bytes),
            Err(CodecError::InvalidValue { field: "Fee", .. })
        ));
    }

    #[test]
    fn common_optionals_roundtrip() {
        let mut c = common(0x01, 9);
        c.flags = Some(0x8000_0000);
        c.source_tag = Some(42);
        c.account_txn_id = Some(Hash256([7; 32]));
        c.last_ledger_sequence = Some(1_000);
        c.previous_txn_id = Some(Hash256([8; 32]));
        c.memos = vec![Memo::from_text("t", "d", "f"), Memo::from_text("", "x", "")];
        let tx = Transaction::new(c, OfferCancel { offer_sequence: 2 });
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn compare_by_account_then_sequence_then_hash() {
        let a1 = Transaction::new(common(1, 5), payment());
        let a2 = Transaction::new(common(1, 6), payment());
        let b1 = Transaction::new(common(2, 1), payment());
        assert_eq!(compare_transactions(&a1, &a2), Ordering::Less);
        assert_eq!(compare_transactions(&b1, &a2), Ordering::Greater);

        let mut h1 = a1.clone();
        let mut h2 = a1.clone();
        h1.hash = Some(Hash256([1; 32]));
        h2.hash = Some(Hash256([2; 32]));
        assert_eq!(compare_transactions(&h1, &h2), Ordering::Less);
        assert_eq!(compare_transactions(&h1, &h1), Ordering::Equal);

        let multi = MultiSignTransaction::new(common(1, 5), payment());
        assert_eq!(compare_transactions(&multi, &a2), Ordering::Less);
    }

    #[test]
    fn json_includes_hash_when_set() {
        let mut tx = Transaction::new(common(0xAA, 1), payment());
        assert!(tx.to_json().get("hash").is_none());
        tx.hash = Some(Hash256([0xCD; 32]));
        let json = tx.to_json();
        assert_eq!(json["hash"], "CD".repeat(32));
        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Amount"], "1000000");
    }
}
