//! # Multi-Signature Aggregation
//!
//! Each signer works independently against the same unsigned base and
//! returns a [`MultiSignEntry`]. Nothing is shared between signers, so the
//! contributions can be produced on separate threads; the caller collects
//! them and calls [`merge_signatures`] once.
//!
//! ```text
//!   base ──┬── multi_sign(key A) ──► entry A ──┐
//!          ├── multi_sign(key B) ──► entry B ──┼── merge_signatures ──► signed tx
//!          └── multi_sign(key C) ──► entry C ──┘
//! ```
//!
//! Merging sorts by account, rejects duplicates and enforces the
//! eight-signer limit before touching the transaction. On any error the
//! transaction is left exactly as it was.

use tracing::{debug, warn};

use super::base::{MultiSignTransaction, SignableTransaction};
use super::hashing::{identity_hash, multi_signing_payload};
use super::types::MultiSignEntry;
use super::verification::{check_signer_order, TransactionError};
use crate::crypto::keys::{MasterKey, PrivateKey};
use crate::crypto::signatures::sign;
use crate::identity::AccountId;

/// Produce one signer's contribution using a master key.
///
/// The signing account is the one the derived key controls:
/// `key.account_id(sequence)`. Use [`multi_sign_as`] when a regular key
/// signs on behalf of another account.
pub fn multi_sign(
    tx: &MultiSignTransaction,
    key: &MasterKey,
    sequence: Option<u32>,
) -> Result<MultiSignEntry, TransactionError> {
    let private_key = key.derive(sequence)?;
    multi_sign_with_private_key(tx, &private_key)
}

/// Produce a contribution with a raw private key, signing as the key's own
/// account.
pub fn multi_sign_with_private_key(
    tx: &MultiSignTransaction,
    key: &PrivateKey,
) -> Result<MultiSignEntry, TransactionError> {
    let account = key.account_id();
    multi_sign_as(tx, key, account)
}

/// Produce a contribution for `account` signed by `key`.
///
/// The digest covers the account, so the entry is only valid for the
/// account named here.
pub fn multi_sign_as(
    tx: &MultiSignTransaction,
    key: &PrivateKey,
    account: AccountId,
) -> Result<MultiSignEntry, TransactionError> {
    let payload = multi_signing_payload(tx, &account)?;
    let txn_signature = sign(key, &payload.digest, &payload.message)?;

    debug!(signer = %account, "multi-sign contribution produced");
    Ok(MultiSignEntry {
        account,
        signing_pub_key: key.public_key(),
        txn_signature,
    })
}

/// Sequential signing over an accumulating buffer.
///
/// Every contribution must cover the same base, so there is nothing
/// meaningful to do sequentially. Always fails.
pub fn multi_sign_serial(
    _tx: &MultiSignTransaction,
    _keys: &[(MasterKey, Option<u32>)],
) -> Result<Vec<MultiSignEntry>, TransactionError> {
    Err(TransactionError::SerialMultiSignUnsupported)
}

/// Merge contributions into the transaction's signer list.
///
/// New entries are combined with any already present, sorted ascending by
/// account and checked: no duplicate accounts, at most eight signers. On
/// success the identity hash is recomputed over the complete encoding.
pub fn merge_signatures(
    tx: &mut MultiSignTransaction,
    entries: Vec<MultiSignEntry>,
) -> Result<(), TransactionError> {
    let mut signers = tx.signers.clone();
    signers.extend(entries);
    signers.sort_by(|a, b| a.account.cmp(&b.account));

    let accounts: Vec<_> = signers.iter().map(|s| s.account).collect();
    if let Err(e) = check_signer_order(&accounts) {
        warn!(signers = signers.len(), error = %e, "signer merge rejected");
        return Err(e);
    }

    let mut merged = tx.clone();
    merged.signers = signers;
    let hash = identity_hash(&merged)?;
    merged.set_hash(hash);

    debug!(signers = merged.signers.len(), hash = %hash, "signers merged");
    *tx = merged;
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
    use crate::transaction::base::TransactionCommon;
    use crate::transaction::kinds::Payment;
    use crate::transaction::verification::verify_multi_signed_transaction;

    fn base() -> MultiSignTransaction {
        MultiSignTransaction::new(
            TransactionCommon::new(AccountId::from_bytes([0x11; 20]), 7, 60),
            Payment {
                destination: AccountId::from_bytes([0x22; 20]),
                amount: Amount::Native(25_000_000),
                send_max: None,
                deliver_min: None,
                paths: None,
                destination_tag: None,
                invoice_id: None,
            },
        )
    }

    fn keys(n: usize) -> Vec<MasterKey> {
        (0..n)
            .map(|i| {
                let key_type = if i % 2 == 0 {
                    KeyType::Secp256k1
                } else {
                    KeyType::Ed25519
                };
                MasterKey::from_passphrase(&format!("signer-{}", i), key_type).unwrap()
            })
            .collect()
    }

    fn sequence_for(key: &MasterKey) -> Option<u32> {
        (key.key_type() == KeyType::Secp256k1).then_some(0)
    }

    fn contributions(tx: &MultiSignTransaction, keys: &[MasterKey]) -> Vec<MultiSignEntry> {
        keys.iter()
            .map(|k| multi_sign(tx, k, sequence_for(k)).unwrap())
            .collect()
    }

    #[test]
    fn entry_account_matches_derived_key() {
        let tx = base();
        let key = &keys(1)[0];
        let entry = multi_sign(&tx, key, Some(0)).unwrap();
        assert_eq!(entry.account, key.account_id(Some(0)).unwrap());
        assert_eq!(entry.signing_pub_key, key.public_key(Some(0)).unwrap());
    }

    #[test]
    fn merge_sorts_and_verifies() {
        let mut tx = base();
        let mut entries = contributions(&tx, &keys(5));
        entries.reverse();
        merge_signatures(&mut tx, entries).unwrap();

        assert_eq!(tx.signers.len(), 5);
        assert!(tx.signers.windows(2).all(|w| w[0].account < w[1].account));
        assert_eq!(tx.hash, Some(identity_hash(&tx).unwrap()));
        assert!(verify_multi_signed_transaction(&tx).is_ok());
    }

    #[test]
    fn merge_in_two_rounds() {
        let mut tx = base();
        let all = contributions(&tx, &keys(4));
        merge_signatures(&mut tx, all[2..].to_vec()).unwrap();
        let first_hash = tx.hash;
        merge_signatures(&mut tx, all[..2].to_vec()).unwrap();

        assert_eq!(tx.signers.len(), 4);
        assert_ne!(tx.hash, first_hash);
        assert!(verify_multi_signed_transaction(&tx).is_ok());
    }

    #[test]
    fn nine_signers_rejected_and_tx_unchanged() {
        let mut tx = base();
        let entries = contributions(&tx, &keys(9));
        let before = tx.clone();
        assert_eq!(
            merge_signatures(&mut tx, entries),
            Err(TransactionError::QuorumExceeded { count: 9, max: 8 })
        );
        assert_eq!(tx, before);
    }

    #[test]
    fn eight_signers_accepted() {
        let mut tx = base();
        let entries = contributions(&tx, &keys(8));
        merge_signatures(&mut tx, entries).unwrap();
        assert_eq!(tx.signers.len(), 8);
    }

    #[test]
    fn duplicate_signer_rejected() {
        let mut tx = base();
        let entries = contributions(&tx, &keys(2));
        merge_signatures(&mut tx, entries.clone()).unwrap();
        let before = tx.clone();
        assert_eq!(
            merge_signatures(&mut tx, vec![entries[0].clone()]),
            Err(TransactionError::DuplicateSigner {
                account: entries[0].account
            })
        );
        assert_eq!(tx, before);
    }

    #[test]
    fn serial_signing_unsupported() {
        let keys: Vec<_> = keys(2).into_iter().map(|k| (k, None)).collect();
        assert_eq!(
            multi_sign_serial(&base(), &keys),
            Err(TransactionError::SerialMultiSignUnsupported)
        );
    }

    #[test]
    fn signature_bound_to_account() {
        let mut tx = base();
        let key = keys(1).remove(0);
        let mut entry = multi_sign(&tx, &key, Some(0)).unwrap();
        entry.account = AccountId::from_bytes([0x01; 20]);
        merge_signatures(&mut tx, vec![entry]).unwrap();
        assert!(verify_multi_signed_transaction(&tx).is_err());
    }

    #[test]
    fn regular_key_signs_for_other_account() {
        let mut tx = base();
        let regular = MasterKey::from_passphrase("regular", KeyType::Secp256k1).unwrap();
        let owner = AccountId::from_bytes([0x33; 20]);
        let entry = multi_sign_as(&tx, &regular.derive(None).unwrap(), owner).unwrap();
        assert_eq!(entry.account, owner);
        merge_signatures(&mut tx, vec![entry]).unwrap();
        assert!(verify_multi_signed_transaction(&tx).is_ok());
    }
}
