//! Single-signer transaction signing.
//!
//! The procedure is fixed by the network:
//!
//! 1. Clear the signature and hash, set `SigningPubKey`.
//! 2. Compute the signing payload: `STX\0` plus the signing encoding.
//! 3. Sign it (secp256k1 signs the digest, Ed25519 the full message).
//! 4. Store `TxnSignature`.
//! 5. Recompute the identity hash over the now complete encoding.
//!
//! Work happens on a copy; the caller's transaction is only replaced once
//! every step has succeeded.

use tracing::debug;

use super::base::{SignableTransaction, Transaction};
use super::hashing::{identity_hash, signing_payload};
use super::verification::TransactionError;
use crate::crypto::keys::{MasterKey, PrivateKey};
use crate::crypto::signatures::sign;

/// Sign with a master key.
///
/// `sequence` selects the derived key: `Some(0)` is an account's standard
/// secp256k1 key, `None` uses the root key unmodified (regular keys and all
/// Ed25519 keys).
///
/// # Example
///
/// ```
/// use ripple_sign::crypto::keys::{KeyType, MasterKey};
/// use ripple_sign::transaction::{sign_transaction, TransactionBuilder};
///
/// let key = MasterKey::from_passphrase("alice", KeyType::Secp256k1).unwrap();
/// let account = key.account_id(Some(0)).unwrap();
/// let mut tx = TransactionBuilder::new(account, 1, 12)
///     .payment(account, 1_000_000)
///     .unwrap();
///
/// sign_transaction(&mut tx, &key, Some(0)).unwrap();
/// assert!(tx.is_signed());
/// assert!(tx.hash.is_some());
/// ```
pub fn sign_transaction(
    tx: &mut Transaction,
    key: &MasterKey,
    sequence: Option<u32>,
) -> Result<(), TransactionError> {
    let private_key = key.derive(sequence)?;
    sign_with_private_key(tx, &private_key)
}

/// Sign with a raw private key.
pub fn sign_with_private_key(
    tx: &mut Transaction,
    key: &PrivateKey,
) -> Result<(), TransactionError> {
    let mut signed = tx.clone();
    signed.initialize_for_signing();
    signed.set_public_key(key.public_key());

    let payload = signing_payload(&signed)?;
    let signature = sign(key, &payload.digest, &payload.message)?;
    signed.set_signature(signature);

    let hash = identity_hash(&signed)?;
    signed.set_hash(hash);

    debug!(
        account = %signed.common.account,
        transaction_type = %signed.transaction_type(),
        hash = %hash,
        "transaction signed"
    );
    *tx = signed;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Amount;
    use crate::crypto::keys::KeyType;
    use crate::identity::AccountId;
    use crate::transaction::base::TransactionCommon;
    use crate::transaction::kinds::Payment;
    use crate::transaction::verification::verify_transaction;

    fn payment(account: AccountId) -> Transaction {
        Transaction::new(
            TransactionCommon::new(account, 1, 12),
            Payment {
                destination: AccountId::from_bytes([0x42; 20]),
                amount: Amount::Native(5_000_000),
                send_max: None,
                deliver_min: None,
                paths: None,
                destination_tag: Some(9),
                invoice_id: None,
            },
        )
    }

    #[test]
    fn sign_sets_key_signature_and_hash() {
        let key = MasterKey::from_passphrase("signer", KeyType::Secp256k1).unwrap();
        let mut tx = payment(key.account_id(Some(0)).unwrap());
        assert!(!tx.is_signed());

        sign_transaction(&mut tx, &key, Some(0)).unwrap();
        assert!(tx.is_signed());
        assert_eq!(tx.signing_pub_key, Some(key.public_key(Some(0)).unwrap()));
        assert_eq!(tx.hash, Some(identity_hash(&tx).unwrap()));
        assert!(verify_transaction(&tx).is_ok());
    }

    #[test]
    fn secp256k1_signing_is_deterministic() {
        let key = MasterKey::from_passphrase("signer", KeyType::Secp256k1).unwrap();
        let mut a = payment(key.account_id(Some(0)).unwrap());
        let mut b = a.clone();
        sign_transaction(&mut a, &key, Some(0)).unwrap();
        sign_transaction(&mut b, &key, Some(0)).unwrap();
        assert_eq!(a.txn_signature, b.txn_signature);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn ed25519_signature_is_64_bytes() {
        let key = MasterKey::from_passphrase("signer", KeyType::Ed25519).unwrap();
        let mut tx = payment(key.account_id(None).unwrap());
        sign_transaction(&mut tx, &key, None).unwrap();
        assert_eq!(tx.txn_signature.as_ref().map(Vec::len), Some(64));
        assert!(verify_transaction(&tx).is_ok());
    }

    #[test]
    fn ed25519_rejects_sequence_and_leaves_tx_alone() {
        let key = MasterKey::from_passphrase("signer", KeyType::Ed25519).unwrap();
        let mut tx = payment(key.account_id(None).unwrap());
        let before = tx.clone();
        assert_eq!(
            sign_transaction(&mut tx, &key, Some(1)),
            Err(TransactionError::Key(crate::crypto::KeyError::SequenceNotSupported))
        );
        assert_eq!(tx, before);
    }

    #[test]
    fn re_signing_replaces_previous_signature() {
        let first = MasterKey::from_passphrase("one", KeyType::Secp256k1).unwrap();
        let second = MasterKey::from_passphrase("two", KeyType::Secp256k1).unwrap();
        let mut tx = payment(first.account_id(Some(0)).unwrap());

        sign_transaction(&mut tx, &first, Some(0)).unwrap();
        let sig1 = tx.txn_signature.clone();
        sign_transaction(&mut tx, &second, Some(0)).unwrap();
        assert_ne!(tx.txn_signature, sig1);
        assert!(verify_transaction(&tx).is_ok());
    }

    #[test]
    fn encode_failure_is_propagated() {
        let key = MasterKey::from_passphrase("signer", KeyType::Secp256k1).unwrap();
        let mut tx = payment(key.account_id(Some(0)).unwrap());
        tx.common.fee = u64::MAX;
        assert!(matches!(
            sign_transaction(&mut tx, &key, Some(0)),
            Err(TransactionError::Codec(_))
        ));
        assert!(!tx.is_signed());
    }
}
