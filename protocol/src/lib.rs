// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ripple-sign: Core Library
//!
//! Offline construction, canonical serialization, hashing, signing and
//! multi-signing of XRP Ledger transactions. The output is byte-for-byte
//! what the network hashes and verifies; a single misplaced field header
//! produces a transaction that is rejected.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the pipeline a transaction
//! goes through:
//!
//! - **codec**: the canonical binary field format, both directions, plus
//!   the network JSON rendering.
//! - **crypto**: SHA-512Half, secp256k1 and Ed25519 keys, per-sequence key
//!   derivation, signatures.
//! - **identity**: Base58Check addresses, seeds and key text forms.
//! - **transaction**: variants, builder, prefixed hashes, single and
//!   multi-signing, verification, submission bodies.
//! - **config**: protocol constants fixed by the network.
//! - **logging**: `tracing` subscriber setup for embedding applications.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple_sign::crypto::keys::{KeyType, MasterKey};
//! use ripple_sign::transaction::{sign_transaction, verify_transaction, SignedSubmission, TransactionBuilder};
//!
//! let key = MasterKey::from_passphrase("masterpassphrase", KeyType::Secp256k1).unwrap();
//! let account = key.account_id(Some(0)).unwrap();
//! assert_eq!(account.to_address(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
//!
//! let destination = ripple_sign::identity::AccountId::from_bytes([0x42; 20]);
//! let mut tx = TransactionBuilder::new(account, 1, 12)
//!     .payment(destination, 1_000_000)
//!     .unwrap();
//! sign_transaction(&mut tx, &key, Some(0)).unwrap();
//! verify_transaction(&tx).unwrap();
//!
//! let submission = SignedSubmission::new(&tx).unwrap();
//! assert_eq!(submission.hash, tx.hash.unwrap());
//! ```
//!
//! Everything here is synchronous and free of shared state. Sequence numbers
//! and fees come from the caller; talking to the network does not happen in
//! this crate.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod logging;
pub mod transaction;
