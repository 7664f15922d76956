//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] collects the common fields (account, sequence,
//! fee and the optional extras), then `build` or `build_multi_signed`
//! attaches a variant and returns an unsigned transaction of the chosen
//! shape. Sequence and fee come from the caller; nothing here talks to the
//! network.
//!
//! The free functions [`payment`], [`signer_list_set`] and
//! [`disable_master_key`] produce validated variants that work with either
//! shape. The builder methods of the same names are shortcuts for the
//! single-signed case.
//!
//! The builder does not sign. That happens in [`super::signing`] and
//! [`super::multisign`].

use std::collections::BTreeSet;

use super::base::{MultiSignTransaction, Transaction, TransactionCommon};
use super::kinds::{AccountSet, Payment, SignerListSet, TransactionKind};
use super::types::{Memo, SignerEntry};
use super::verification::TransactionError;
use crate::codec::{Amount, Hash256};
use crate::config::{ASF_DISABLE_MASTER, MAX_MULTI_SIGNERS, MAX_NATIVE_DROPS};
use crate::identity::AccountId;

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned transactions.
///
/// # Usage
///
/// ```rust
/// use ripple_sign::transaction::TransactionBuilder;
/// use ripple_sign::transaction::types::Memo;
///
/// let tx = TransactionBuilder::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh", 1, 12)
///     .unwrap()
///     .last_ledger_sequence(8_000_000)
///     .memo(Memo::from_text("note", "hello", "text/plain"))
///     .disable_master_key()
///     .unwrap();
/// assert!(!tx.is_signed());
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    common: TransactionCommon,
}

impl TransactionBuilder {
    /// Start a transaction from `account` with the given sequence and fee
    /// (in drops).
    pub fn new(account: AccountId, sequence: u32, fee: u64) -> Self {
        Self {
            common: TransactionCommon::new(account, sequence, fee),
        }
    }

    /// Like [`new`](Self::new), with the account given as an address.
    pub fn from_address(address: &str, sequence: u32, fee: u64) -> Result<Self, TransactionError> {
        Ok(Self::new(AccountId::from_address(address)?, sequence, fee))
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.common.flags = Some(flags);
        self
    }

    pub fn source_tag(mut self, tag: u32) -> Self {
        self.common.source_tag = Some(tag);
        self
    }

    /// Only valid while `hash` is the account's most recent transaction.
    pub fn account_txn_id(mut self, hash: Hash256) -> Self {
        self.common.account_txn_id = Some(hash);
        self
    }

    /// Last ledger in which the transaction may be included.
    pub fn last_ledger_sequence(mut self, ledger: u32) -> Self {
        self.common.last_ledger_sequence = Some(ledger);
        self
    }

    pub fn previous_txn_id(mut self, hash: Hash256) -> Self {
        self.common.previous_txn_id = Some(hash);
        self
    }

    /// Append a memo. Memos keep insertion order.
    pub fn memo(mut self, memo: Memo) -> Self {
        self.common.memos.push(memo);
        self
    }

    fn validated_common(self) -> Result<TransactionCommon, TransactionError> {
        check_drops("Fee", self.common.fee)?;
        Ok(self.common)
    }

    /// Attach a variant and produce an unsigned single-signed transaction.
    pub fn build(self, kind: impl Into<TransactionKind>) -> Result<Transaction, TransactionError> {
        Ok(Transaction::new(self.validated_common()?, kind))
    }

    /// Attach a variant and produce an unsigned multi-signed transaction.
    pub fn build_multi_signed(
        self,
        kind: impl Into<TransactionKind>,
    ) -> Result<MultiSignTransaction, TransactionError> {
        Ok(MultiSignTransaction::new(self.validated_common()?, kind))
    }

    /// Native payment of `drops` to `destination`.
    pub fn payment(self, destination: AccountId, drops: u64) -> Result<Transaction, TransactionError> {
        let kind = payment(destination, drops)?;
        self.build(kind)
    }

    /// Replace the account's signer list.
    pub fn signer_list_set(
        self,
        quorum: u32,
        entries: Vec<SignerEntry>,
    ) -> Result<Transaction, TransactionError> {
        let kind = signer_list_set(quorum, entries)?;
        self.build(kind)
    }

    /// Disable the account's master key.
    pub fn disable_master_key(self) -> Result<Transaction, TransactionError> {
        self.build(disable_master_key())
    }
}

// ---------------------------------------------------------------------------
// Validated variants
// ---------------------------------------------------------------------------

fn check_drops(field: &'static str, drops: u64) -> Result<(), TransactionError> {
    if drops == 0 {
        return Err(TransactionError::InvalidParameter {
            field,
            reason: "must be greater than zero".into(),
        });
    }
    if drops > MAX_NATIVE_DROPS {
        return Err(TransactionError::InvalidParameter {
            field,
            reason: format!("{} drops exceeds the maximum of {}", drops, MAX_NATIVE_DROPS),
        });
    }
    Ok(())
}

/// A native payment. The amount must be positive.
pub fn payment(destination: AccountId, drops: u64) -> Result<Payment, TransactionError> {
    check_drops("Amount", drops)?;
    Ok(Payment {
        destination,
        amount: Amount::Native(drops),
        send_max: None,
        deliver_min: None,
        paths: None,
        destination_tag: None,
        invoice_id: None,
    })
}

/// A signer list replacement.
///
/// At most eight entries, no account listed twice, and the quorum must be
/// reachable by the summed weights. An empty list with quorum 0 deletes the
/// account's signer list.
pub fn signer_list_set(
    quorum: u32,
    entries: Vec<SignerEntry>,
) -> Result<SignerListSet, TransactionError> {
    if entries.is_empty() {
        if quorum != 0 {
            return Err(TransactionError::InvalidParameter {
                field: "SignerQuorum",
                reason: "must be 0 when deleting the signer list".into(),
            });
        }
        return Ok(SignerListSet {
            signer_quorum: 0,
            signer_entries: entries,
        });
    }

    if entries.len() > MAX_MULTI_SIGNERS {
        return Err(TransactionError::QuorumExceeded {
            count: entries.len(),
            max: MAX_MULTI_SIGNERS,
        });
    }
    let mut seen = BTreeSet::new();
    for entry in &entries {
        if !seen.insert(entry.account) {
            return Err(TransactionError::DuplicateSigner {
                account: entry.account,
            });
        }
    }

    let total: u64 = entries.iter().map(|e| u64::from(e.signer_weight)).sum();
    if quorum == 0 || u64::from(quorum) > total {
        return Err(TransactionError::InvalidParameter {
            field: "SignerQuorum",
            reason: format!("quorum {} not in 1..={}", quorum, total),
        });
    }

    Ok(SignerListSet {
        signer_quorum: quorum,
        signer_entries: entries,
    })
}

/// `AccountSet` with `SetFlag = asfDisableMaster`.
pub fn disable_master_key() -> AccountSet {
    AccountSet {
        set_flag: Some(ASF_DISABLE_MASTER),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AddressError;
    use crate::transaction::base::SignableTransaction;
    use crate::transaction::types::TransactionType;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 20])
    }

    fn builder() -> TransactionBuilder {
        TransactionBuilder::new(account(1), 5, 12)
    }

    #[test]
    fn builder_sets_common_fields() {
        let tx = builder()
            .flags(0x8000_0000)
            .source_tag(7)
            .last_ledger_sequence(99)
            .memo(Memo::from_text("a", "b", ""))
            .payment(account(2), 1_000)
            .unwrap();
        assert_eq!(tx.common.account, account(1));
        assert_eq!(tx.common.sequence, 5);
        assert_eq!(tx.common.fee, 12);
        assert_eq!(tx.common.flags, Some(0x8000_0000));
        assert_eq!(tx.common.source_tag, Some(7));
        assert_eq!(tx.common.last_ledger_sequence, Some(99));
        assert_eq!(tx.common.memos.len(), 1);
        assert_eq!(tx.transaction_type(), TransactionType::Payment);
        assert!(!tx.is_signed());
    }

    #[test]
    fn payment_rejects_zero_amount_and_zero_fee() {
        assert!(matches!(
            builder().payment(account(2), 0),
            Err(TransactionError::InvalidParameter { field: "Amount", .. })
        ));
        assert!(matches!(
            TransactionBuilder::new(account(1), 5, 0).payment(account(2), 10),
            Err(TransactionError::InvalidParameter { field: "Fee", .. })
        ));
        assert!(matches!(
            payment(account(2), MAX_NATIVE_DROPS + 1),
            Err(TransactionError::InvalidParameter { field: "Amount", .. })
        ));
    }

    #[test]
    fn from_address_validates() {
        let b = TransactionBuilder::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh", 1, 10);
        assert!(b.is_ok());
        assert!(matches!(
            TransactionBuilder::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTx", 1, 10),
            Err(TransactionError::Address(AddressError::Checksum))
        ));
    }

    #[test]
    fn signer_list_rules() {
        let entries: Vec<_> = (1..=3).map(|i| SignerEntry::new(account(i), 1)).collect();
        let set = signer_list_set(2, entries.clone()).unwrap();
        assert_eq!(set.signer_quorum, 2);
        assert_eq!(set.signer_entries.len(), 3);

        assert!(matches!(
            signer_list_set(4, entries.clone()),
            Err(TransactionError::InvalidParameter { field: "SignerQuorum", .. })
        ));
        assert!(matches!(
            signer_list_set(0, entries),
            Err(TransactionError::InvalidParameter { field: "SignerQuorum", .. })
        ));

        let dup = vec![SignerEntry::new(account(1), 1), SignerEntry::new(account(1), 2)];
        assert_eq!(
            signer_list_set(1, dup),
            Err(TransactionError::DuplicateSigner { account: account(1) })
        );

        let nine: Vec<_> = (1..=9).map(|i| SignerEntry::new(account(i), 1)).collect();
        assert_eq!(
            signer_list_set(1, nine),
            Err(TransactionError::QuorumExceeded { count: 9, max: 8 })
        );
    }

    #[test]
    fn empty_signer_list_deletes() {
        let delete = signer_list_set(0, Vec::new()).unwrap();
        assert!(delete.signer_entries.is_empty());
        assert!(signer_list_set(1, Vec::new()).is_err());

        let tx = builder().signer_list_set(0, Vec::new()).unwrap();
        let decoded = Transaction::decode(&tx.encode().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn disable_master_sets_flag_four() {
        let tx = builder().disable_master_key().unwrap();
        match &tx.kind {
            TransactionKind::AccountSet(set) => assert_eq!(set.set_flag, Some(4)),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn multi_signed_shape() {
        let tx = builder()
            .build_multi_signed(payment(account(2), 500).unwrap())
            .unwrap();
        assert!(tx.signers.is_empty());
        assert_eq!(tx.transaction_type(), TransactionType::Payment);
    }
}
