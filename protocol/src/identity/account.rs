//! # Account Identifiers
//!
//! An account on the ledger is named by 20 bytes:
//!
//! ```text
//! public_key (33 bytes, secp256k1 compressed or 0xED-tagged Ed25519)
//!     -> SHA-256 -> RIPEMD-160 -> 20-byte AccountID
//!     -> Base58Check(0x00 ‖ id) -> rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh
//! ```
//!
//! `AccountId` orders byte-lexicographically, which is exactly the order
//! the ledger demands for multi-signer lists.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::base58::{decode_check, encode_check, AddressError};
use crate::config::{ACCOUNT_ID_LENGTH, PREFIX_ACCOUNT_ID};
use crate::crypto::hash::account_hash;

/// A 20-byte ledger account identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LENGTH]);

impl AccountId {
    /// Wrap raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; ACCOUNT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ACCOUNT_ID_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidLength {
                expected: ACCOUNT_ID_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Derive the account that a serialized public key controls.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self(account_hash(public_key))
    }

    /// Parse an `r…` address.
    pub fn from_address(address: &str) -> Result<Self, AddressError> {
        let body = decode_check(address, PREFIX_ACCOUNT_ID, ACCOUNT_ID_LENGTH)?;
        Self::from_slice(&body)
    }

    /// Render as an `r…` address.
    pub fn to_address(&self) -> String {
        encode_check(PREFIX_ACCOUNT_ID, &self.0)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_address(&s).map_err(serde::de::Error::custom)
    }
}

/// True when `address` is a well-formed account address.
pub fn is_valid_address(address: &str) -> bool {
    AccountId::from_address(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip() {
        let id = AccountId::from_bytes([0xAB; 20]);
        let parsed: AccountId = id.to_address().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_known_address() {
        let id = AccountId::from_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh").unwrap();
        assert_eq!(id.to_hex(), "B5F762798A53D543A014CAF8B297CFF8F2F937E8");
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let mut low = [0u8; 20];
        low[0] = 0x01;
        let mut high = [0u8; 20];
        high[0] = 0x02;
        assert!(AccountId::from_bytes(low) < AccountId::from_bytes(high));
    }

    #[test]
    fn test_serde_uses_address_form() {
        let id = AccountId::default();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"rrrrrrrrrrrrrrrrrrrrrhoLvTp\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_slice_length_checked() {
        assert!(AccountId::from_slice(&[0u8; 19]).is_err());
        assert!(AccountId::from_slice(&[0u8; 20]).is_ok());
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"));
        assert!(!is_valid_address("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTi"));
        assert!(!is_valid_address(""));
    }
}
