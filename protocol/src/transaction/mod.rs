//! # Transaction Module
//!
//! Construction, hashing, signing, multi-signing, verification and the
//! submission boundary for ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TransactionType, Memo, SignerEntry, MultiSignEntry
//! kinds.rs        One struct per transaction variant, TransactionKind
//! base.rs         Common fields, the two shapes, SignableTransaction
//! builder.rs      Fluent TransactionBuilder and validated variants
//! hashing.rs      Prefixed SHA-512Half digests
//! signing.rs      Single-signer flow
//! multisign.rs    Per-signer contributions and the sorted merge
//! verification.rs Signature and hash checks, TransactionError
//! submission.rs   Blobs and request bodies for the transport
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] with a caller-supplied sequence and fee.
//! 2. **Sign**: [`sign_transaction`], or [`multi_sign`] once per signer
//!    followed by [`merge_signatures`].
//! 3. **Verify**: [`verify_transaction`] / [`verify_multi_signed_transaction`].
//! 4. **Submit**: wrap in a [`SignedSubmission`] or [`MultiSignedSubmission`]
//!    and hand the request body to the transport.
//!
//! Signing never mutates the caller's transaction on failure, and every
//! encoding error is returned rather than swallowed.

pub mod base;
pub mod builder;
pub mod hashing;
pub mod kinds;
pub mod multisign;
pub mod signing;
pub mod submission;
pub mod types;
pub mod verification;

pub use base::{compare_transactions, MultiSignTransaction, SignableTransaction, Transaction, TransactionCommon};
pub use builder::TransactionBuilder;
pub use hashing::{identity_hash, multi_signing_hash, signing_hash, HashPrefix, SigningPayload};
pub use kinds::TransactionKind;
pub use multisign::{merge_signatures, multi_sign, multi_sign_serial, multi_sign_with_private_key};
pub use signing::{sign_transaction, sign_with_private_key};
pub use submission::{MultiSignedSubmission, SignedSubmission, SubmissionSession};
pub use types::{Memo, MultiSignEntry, SignerEntry, TransactionType};
pub use verification::{verify_multi_signed_transaction, verify_transaction, TransactionError};
