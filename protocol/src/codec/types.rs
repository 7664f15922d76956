//! Fixed-width hash values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::CodecError;

macro_rules! hash_type {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
                let arr: [u8; $len] = bytes.try_into().map_err(|_| CodecError::InvalidValue {
                    field: stringify!($name),
                    reason: format!("expected {} bytes, got {}", $len, bytes.len()),
                })?;
                Ok(Self(arr))
            }

            pub fn from_hex(hex_str: &str) -> Result<Self, CodecError> {
                let bytes = hex::decode(hex_str).map_err(|e| CodecError::InvalidValue {
                    field: stringify!($name),
                    reason: e.to_string(),
                })?;
                Self::from_slice(&bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode_upper(self.0)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

hash_type!(
    /// 128-bit hash (e.g. `EmailHash`).
    Hash128,
    16
);

hash_type!(
    /// 256-bit hash: transaction IDs, ledger object IDs.
    Hash256,
    32
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_uppercase() {
        let h = Hash256([0xab; 32]);
        assert_eq!(h.to_hex(), "AB".repeat(32));
        assert_eq!(Hash256::from_hex(&h.to_hex().to_lowercase()).unwrap(), h);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(Hash128::from_slice(&[0u8; 15]).is_err());
        assert!(Hash256::from_hex("ABCD").is_err());
        assert!(Hash256::from_hex("zz").is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let h = Hash128([1; 16]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(16)));
        let back: Hash128 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
