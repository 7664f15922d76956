//! # Identity Module
//!
//! Human-readable names for keys and accounts. Everything a user ever
//! types or pastes (an `r…` address, an `s…` seed, an `a…` public key)
//! passes through here.
//!
//! The stack is layered:
//!
//! 1. **base58**: Base58Check in the ledger alphabet, with typed prefixes.
//! 2. **account**: 20-byte account identifiers and their address form.
//! 3. **seed**: 16-byte seed entropy for either key family.
//!
//! Key material itself lives in [`crate::crypto::keys`]; this module only
//! names it.

pub mod account;
pub mod base58;
pub mod seed;

pub use account::{is_valid_address, AccountId};
pub use base58::AddressError;
pub use seed::{is_valid_seed, Seed};
