//! # Cryptographic Primitives
//!
//! Every hash, key and signature the ledger cares about flows through here:
//!
//! - **SHA-512Half** for transaction hashes, signing digests and key
//!   derivation.
//! - **SHA-256 / RIPEMD-160** for account identifiers and Base58 checksums.
//! - **secp256k1 ECDSA** (`k256`) for family-seed accounts.
//! - **Ed25519** (`ed25519-dalek`) for `sEd…` accounts.
//!
//! Everything is a thin, typed wrapper around audited implementations.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{account_hash, double_sha256, sha256, sha512_half};
pub use keys::{KeyError, KeyType, MasterKey, PrivateKey, PublicKey};
pub use signatures::{sign, verify, SignatureError};
