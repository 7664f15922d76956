//! Submission boundary.
//!
//! A signed transaction leaves the core as a [`SignedSubmission`] (hex blob
//! plus hash) or a [`MultiSignedSubmission`] (JSON form with its signer
//! list plus hash). Posting them and interpreting the engine result belongs
//! to the caller's transport. [`SubmissionSession`] only shapes the request
//! bodies for the `submit` and `submit_multisigned` commands and numbers
//! them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::trace;

use super::base::{MultiSignTransaction, SignableTransaction, Transaction};
use super::types::MultiSignEntry;
use super::verification::TransactionError;
use crate::codec::Hash256;

/// A single-signed transaction ready for `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// Upper-case hex of the full encoding.
    pub tx_blob: String,
    pub hash: Hash256,
}

impl SignedSubmission {
    /// Package a signed transaction. Unsigned ones are refused.
    pub fn new(tx: &Transaction) -> Result<Self, TransactionError> {
        if !tx.is_signed() {
            return Err(TransactionError::NotSigned);
        }
        let hash = tx.hash.ok_or(TransactionError::NotSigned)?;
        Ok(Self {
            tx_blob: tx.to_hex()?,
            hash,
        })
    }
}

/// A multi-signed transaction ready for `submit_multisigned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSignedSubmission {
    /// The network JSON form, `Signers` included.
    pub tx_json: Value,
    pub signers: Vec<MultiSignEntry>,
    pub hash: Hash256,
}

impl MultiSignedSubmission {
    /// Package a merged transaction. One without signers is refused.
    pub fn new(tx: &MultiSignTransaction) -> Result<Self, TransactionError> {
        if tx.signers.is_empty() {
            return Err(TransactionError::NotSigned);
        }
        let hash = tx.hash.ok_or(TransactionError::NotSigned)?;
        Ok(Self {
            tx_json: tx.to_json(),
            signers: tx.signers.clone(),
            hash,
        })
    }
}

/// Numbers request bodies for one connection.
///
/// Ids start at 1 and increase by one per request, across both commands.
/// The counter is atomic so a session can be shared between threads.
#[derive(Debug, Default)]
pub struct SubmissionSession {
    next_id: AtomicU64,
}

impl SubmissionSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// `{"id", "command": "submit", "tx_blob"}`.
    pub fn submit_request(&self, submission: &SignedSubmission) -> Value {
        let id = self.next_id();
        trace!(id, hash = %submission.hash, "submit request");
        json!({
            "id": id,
            "command": "submit",
            "tx_blob": submission.tx_blob,
        })
    }

    /// `{"id", "command": "submit_multisigned", "tx_json"}`.
    pub fn submit_multisigned_request(&self, submission: &MultiSignedSubmission) -> Value {
        let id = self.next_id();
        trace!(id, hash = %submission.hash, signers = submission.signers.len(), "submit_multisigned request");
        json!({
            "id": id,
            "command": "submit_multisigned",
            "tx_json": submission.tx_json,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
