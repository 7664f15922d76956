//! # Seeds
//!
//! A seed is 16 bytes of entropy plus a note about which key family to
//! grow from it. The text form tells the two apart:
//!
//! | family    | prefix bytes       | text starts with |
//! |-----------|--------------------|------------------|
//! | secp256k1 | `0x21`             | `s`              |
//! | Ed25519   | `0x01 0xE1 0x4B`   | `sEd`            |
//!
//! Seeds are secrets. `Seed` deliberately has no `Display` and its `Debug`
//! output hides the entropy.

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

use super::base58::{decode_check_payload, encode_check, AddressError};
use crate::config::{PREFIX_ED25519_SEED, PREFIX_FAMILY_SEED, SEED_LENGTH};
use crate::crypto::hash::sha512_half;
use crate::crypto::keys::KeyType;

/// Seed entropy tagged with its key family.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    entropy: [u8; SEED_LENGTH],
    key_type: KeyType,
}

impl Seed {
    pub fn from_entropy(entropy: [u8; SEED_LENGTH], key_type: KeyType) -> Self {
        Self { entropy, key_type }
    }

    /// Fresh entropy from the OS RNG.
    pub fn random(key_type: KeyType) -> Self {
        let mut entropy = [0u8; SEED_LENGTH];
        OsRng.fill_bytes(&mut entropy);
        Self { entropy, key_type }
    }

    /// Derive a seed from a passphrase: the first 16 bytes of its
    /// SHA-512Half.
    ///
    /// Passphrase seeds are only as strong as the passphrase. Fine for test
    /// fixtures and the genesis account; not for real funds.
    pub fn from_passphrase(passphrase: &str, key_type: KeyType) -> Self {
        let digest = sha512_half(passphrase.as_bytes());
        let mut entropy = [0u8; SEED_LENGTH];
        entropy.copy_from_slice(&digest[..SEED_LENGTH]);
        Self { entropy, key_type }
    }

    /// Parse either text form. The family comes from the prefix.
    pub fn decode(text: &str) -> Result<Self, AddressError> {
        let payload = decode_check_payload(text)?;

        let (prefix, key_type) = if payload.len() == PREFIX_ED25519_SEED.len() + SEED_LENGTH
            && payload.starts_with(PREFIX_ED25519_SEED)
        {
            (PREFIX_ED25519_SEED, KeyType::Ed25519)
        } else if payload.starts_with(PREFIX_FAMILY_SEED) {
            (PREFIX_FAMILY_SEED, KeyType::Secp256k1)
        } else {
            return Err(AddressError::AddressFormat {
                expected: hex::encode(PREFIX_FAMILY_SEED),
                actual: hex::encode(&payload[..1]),
            });
        };

        let body = &payload[prefix.len()..];
        let entropy: [u8; SEED_LENGTH] =
            body.try_into().map_err(|_| AddressError::InvalidLength {
                expected: SEED_LENGTH,
                actual: body.len(),
            })?;
        Ok(Self { entropy, key_type })
    }

    /// Render in the text form matching the key family.
    pub fn encode(&self) -> String {
        match self.key_type {
            KeyType::Secp256k1 => encode_check(PREFIX_FAMILY_SEED, &self.entropy),
            KeyType::Ed25519 => encode_check(PREFIX_ED25519_SEED, &self.entropy),
        }
    }

    pub fn entropy(&self) -> &[u8; SEED_LENGTH] {
        &self.entropy
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// True when `text` decodes as a seed of either family.
pub fn is_valid_seed(text: &str) -> bool {
    Seed::decode(text).is_ok()
}
