//! Transaction verification: signature checks for both shapes.
//!
//! [`verify_transaction`] checks a single-signed transaction against its
//! embedded public key. [`verify_multi_signed_transaction`] checks the
//! signer list's structure first (count, order) and then every signature
//! against its own per-account digest. Structural checks run before any
//! curve arithmetic.

use thiserror::Error;

use super::base::{MultiSignTransaction, SignableTransaction, Transaction};
use super::hashing::{identity_hash, multi_signing_payload, signing_payload};
use crate::codec::{CodecError, Hash256};
use crate::config::MAX_MULTI_SIGNERS;
use crate::crypto::signatures::verify_with_key;
use crate::crypto::{KeyError, SignatureError};
use crate::identity::{AccountId, AddressError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from building, signing, merging or verifying transactions.
///
/// Lower-level failures are wrapped unchanged so callers can still match on
/// the precise cause.
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Address(#[from] AddressError),

    /// More signers than the network accepts on one transaction.
    #[error("{count} signers exceeds the maximum of {max}")]
    QuorumExceeded { count: usize, max: usize },

    #[error("account {account} appears more than once in the signer list")]
    DuplicateSigner { account: AccountId },

    #[error("signer list is not sorted by account")]
    UnsortedSigners,

    /// Sequential signing over a growing buffer has no defined semantics.
    #[error("serial multi-signing is not supported")]
    SerialMultiSignUnsupported,

    #[error("transaction is not signed")]
    NotSigned,

    /// The stored hash does not match the one recomputed from the fields.
    #[error("hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: Hash256, computed: Hash256 },

    /// A builder argument that the network would reject.
    #[error("invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// Check a signer list's shape: at most eight entries, strictly
/// ascending by account.
pub(crate) fn check_signer_order(accounts: &[AccountId]) -> Result<(), TransactionError> {
    if accounts.len() > MAX_MULTI_SIGNERS {
        return Err(TransactionError::QuorumExceeded {
            count: accounts.len(),
            max: MAX_MULTI_SIGNERS,
        });
    }
    for pair in accounts.windows(2) {
        if pair[0] == pair[1] {
            return Err(TransactionError::DuplicateSigner { account: pair[0] });
        }
        if pair[0] > pair[1] {
            return Err(TransactionError::UnsortedSigners);
        }
    }
    Ok(())
}

fn check_hash<T: SignableTransaction>(tx: &T) -> Result<(), TransactionError> {
    if let Some(stored) = tx.hash() {
        let computed = identity_hash(tx)?;
        if *stored != computed {
            return Err(TransactionError::HashMismatch {
                stored: *stored,
                computed,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a single-signed transaction's signature and, if set, its hash.
pub fn verify_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    let public_key = tx.signing_pub_key.as_ref().ok_or(TransactionError::NotSigned)?;
    let signature = tx.txn_signature.as_deref().ok_or(TransactionError::NotSigned)?;

    let payload = signing_payload(tx)?;
    verify_with_key(public_key, &payload.digest, &payload.message, signature)?;
    check_hash(tx)
}

/// Verify every signer of a multi-signed transaction and, if set, its hash.
pub fn verify_multi_signed_transaction(tx: &MultiSignTransaction) -> Result<(), TransactionError> {
    if tx.signers.is_empty() {
        return Err(TransactionError::NotSigned);
    }
    let accounts: Vec<AccountId> = tx.signers.iter().map(|s| s.account).collect();
    check_signer_order(&accounts)?;

    for signer in &tx.signers {
        let payload = multi_signing_payload(tx, &signer.account)?;
        verify_with_key(
            &signer.signing_pub_key,
            &payload.digest,
            &payload.message,
            &signer.txn_signature,
        )?;
    }
    check_hash(tx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{KeyType, MasterKey};
    use crate::transaction::base::TransactionCommon;
    use crate::transaction::kinds::OfferCancel;
    use crate::transaction::signing::sign_transaction;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 20])
    }

    fn signed(key_type: KeyType) -> Transaction {
        let key = MasterKey::from_passphrase("verify", key_type).unwrap();
        let sequence = (key_type == KeyType::Secp256k1).then_some(0);
        let common = TransactionCommon::new(key.account_id(sequence).unwrap(), 4, 10);
        let mut tx = Transaction::new(common, OfferCancel { offer_sequence: 2 });
        sign_transaction(&mut tx, &key, sequence).unwrap();
        tx
    }

    #[test]
    fn signer_order_rules() {
        assert!(check_signer_order(&[]).is_ok());
        assert!(check_signer_order(&[account(1), account(2), account(9)]).is_ok());
        assert_eq!(
            check_signer_order(&[account(2), account(1)]),
            Err(TransactionError::UnsortedSigners)
        );
        assert_eq!(
            check_signer_order(&[account(1), account(1)]),
            Err(TransactionError::DuplicateSigner { account: account(1) })
        );
        let nine: Vec<_> = (1..=9).map(account).collect();
        assert_eq!(
            check_signer_order(&nine),
            Err(TransactionError::QuorumExceeded { count: 9, max: 8 })
        );
    }

    #[test]
    fn unsigned_transaction_is_not_verified() {
        let tx = Transaction::new(
            TransactionCommon::new(account(1), 1, 10),
            OfferCancel { offer_sequence: 2 },
        );
        assert_eq!(verify_transaction(&tx), Err(TransactionError::NotSigned));

        let multi = MultiSignTransaction::new(
            TransactionCommon::new(account(1), 1, 10),
            OfferCancel { offer_sequence: 2 },
        );
        assert_eq!(
            verify_multi_signed_transaction(&multi),
            Err(TransactionError::NotSigned)
        );
    }

    #[test]
    fn tampered_field_fails_verification() {
        for key_type in [KeyType::Secp256k1, KeyType::Ed25519] {
            let mut tx = signed(key_type);
            assert_eq!(verify_transaction(&tx), Ok(()));
            tx.common.sequence += 1;
            assert_eq!(
                verify_transaction(&tx),
                Err(TransactionError::Signature(SignatureError::VerificationFailed)),
                "{:?}",
                key_type
            );
        }
    }

    #[test]
    fn stale_hash_detected() {
        let mut tx = signed(KeyType::Secp256k1);
        let real = tx.hash.unwrap();
        tx.hash = Some(Hash256([0; 32]));
        assert_eq!(
            verify_transaction(&tx),
            Err(TransactionError::HashMismatch {
                stored: Hash256([0; 32]),
                computed: real,
            })
        );
    }
}
