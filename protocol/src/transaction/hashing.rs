//! # Transaction Hashing
//!
//! Every digest is `SHA512Half(prefix ‖ payload)` with a 4-byte prefix
//! naming its purpose. An unprefixed transaction hash is never produced.
//!
//! | Purpose        | Prefix       | Payload                                        |
//! |----------------|--------------|------------------------------------------------|
//! | signing        | `STX\0`      | signing encoding (key set, no signature)       |
//! | identity       | `TXN\0`      | full encoding                                  |
//! | multi-signing  | `SMT\0`      | signing encoding (empty key) ‖ signer account  |
//!
//! Edwards keys sign the whole prefixed message rather than the digest, so
//! the signing helpers return both in a [`SigningPayload`].

use super::base::{MultiSignTransaction, SignableTransaction, Transaction};
use crate::codec::{CodecError, Hash256};
use crate::config::{HASH_PREFIX_MULTI_SIGN, HASH_PREFIX_TRANSACTION_ID, HASH_PREFIX_TRANSACTION_SIGN};
use crate::crypto::hash::sha512_half;
use crate::identity::AccountId;

/// Domain-separation prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashPrefix {
    /// `TXN\0`: identity hash of a complete transaction.
    TransactionId,
    /// `STX\0`: single-signer signing hash.
    TransactionSign,
    /// `SMT\0`: per-signer multi-signing hash.
    MultiSign,
}

impl HashPrefix {
    pub fn value(self) -> u32 {
        match self {
            HashPrefix::TransactionId => HASH_PREFIX_TRANSACTION_ID,
            HashPrefix::TransactionSign => HASH_PREFIX_TRANSACTION_SIGN,
            HashPrefix::MultiSign => HASH_PREFIX_MULTI_SIGN,
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.value().to_be_bytes()
    }
}

/// What a signer needs: the digest (for secp256k1) and the full prefixed
/// message it was computed over (for Ed25519).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningPayload {
    pub digest: [u8; 32],
    pub message: Vec<u8>,
}

impl SigningPayload {
    fn new(prefix: HashPrefix, parts: &[&[u8]]) -> Self {
        let mut message = prefix.to_bytes().to_vec();
        for part in parts {
            message.extend_from_slice(part);
        }
        Self {
            digest: sha512_half(&message),
            message,
        }
    }
}

/// Payload a single signer signs. The public key must already be set.
pub fn signing_payload(tx: &Transaction) -> Result<SigningPayload, CodecError> {
    if tx.signing_pub_key.is_none() {
        return Err(CodecError::MissingField("SigningPubKey"));
    }
    let encoded = tx.encode_for_signing()?;
    Ok(SigningPayload::new(tx.signing_prefix(), &[encoded.as_slice()]))
}

/// The single-signer signing hash.
pub fn signing_hash(tx: &Transaction) -> Result<Hash256, CodecError> {
    Ok(Hash256(signing_payload(tx)?.digest))
}

/// Payload `account` signs as one of several signers.
pub fn multi_signing_payload(
    tx: &MultiSignTransaction,
    account: &AccountId,
) -> Result<SigningPayload, CodecError> {
    let encoded = tx.encode_for_signing()?;
    Ok(SigningPayload::new(
        tx.signing_prefix(),
        &[encoded.as_slice(), account.as_bytes().as_slice()],
    ))
}

pub fn multi_signing_hash(
    tx: &MultiSignTransaction,
    account: &AccountId,
) -> Result<Hash256, CodecError> {
    Ok(Hash256(multi_signing_payload(tx, account)?.digest))
}

/// The permanent transaction ID, over the full encoding.
pub fn identity_hash<T: SignableTransaction + ?Sized>(tx: &T) -> Result<Hash256, CodecError> {
    let encoded = tx.encode()?;
    Ok(Hash256(
        SigningPayload::new(HashPrefix::TransactionId, &[encoded.as_slice()]).digest,
    ))
}
