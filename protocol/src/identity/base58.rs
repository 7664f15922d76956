//! # Base58Check
//!
//! Every human-readable value the ledger deals in (addresses, seeds, node
//! public keys, private keys) is a Base58Check string:
//!
//! ```text
//! payload  = type_prefix ‖ body
//! checksum = SHA-256(SHA-256(payload))[..4]
//! text     = base58_ripple(payload ‖ checksum)
//! ```
//!
//! The alphabet is the ledger's own ordering (`rpshnaf39wBUDNEGHJKLM4PQRST7VW…`),
//! not Bitcoin's, which is why account addresses start with `r` instead of
//! `1`. Decoding always verifies the checksum before it looks at the prefix,
//! so a typo reports as a checksum failure rather than as "wrong kind of
//! string".

use thiserror::Error;

use crate::config::CHECKSUM_LENGTH;
use crate::crypto::hash::double_sha256;

/// Errors from decoding a Base58Check string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The trailing 4 bytes do not match the recomputed checksum.
    #[error("base58 checksum mismatch")]
    Checksum,

    /// The checksum is fine but the type prefix is not the one expected.
    #[error("unexpected type prefix: expected {expected}, got {actual}")]
    AddressFormat {
        /// Hex of the expected prefix.
        expected: String,
        /// Hex of the prefix actually found.
        actual: String,
    },

    /// The string contains characters outside the alphabet.
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// The decoded body has the wrong size for its type.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected number of body bytes.
        expected: usize,
        /// Actual number of body bytes.
        actual: usize,
    },
}

/// Encode `prefix ‖ body` with a checksum using the ledger alphabet.
///
/// # Example
///
/// ```
/// use ripple_sign::identity::base58::encode_check;
///
/// // The all-zero account ID is a well-known placeholder address.
/// assert_eq!(encode_check(&[0x00], &[0u8; 20]), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
/// ```
pub fn encode_check(prefix: &[u8], body: &[u8]) -> String {
    let mut payload = Vec::with_capacity(prefix.len() + body.len() + CHECKSUM_LENGTH);
    payload.extend_from_slice(prefix);
    payload.extend_from_slice(body);
    let checksum = double_sha256(&payload);
    payload.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);
    encode_raw(&payload)
}

/// Plain Base58 in the ledger alphabet, no checksum.
pub fn encode_raw(data: &[u8]) -> String {
    bs58::encode(data)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_string()
}

/// Decode a Base58Check string and verify its checksum.
///
/// Returns the payload (prefix and body, checksum stripped). Prefix
/// validation is left to the caller; see [`decode_check`].
pub fn decode_check_payload(text: &str) -> Result<Vec<u8>, AddressError> {
    let mut raw = bs58::decode(text)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;

    if raw.len() <= CHECKSUM_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: CHECKSUM_LENGTH + 1,
            actual: raw.len(),
        });
    }

    let split = raw.len() - CHECKSUM_LENGTH;
    let expected = double_sha256(&raw[..split]);
    if raw[split..] != expected[..CHECKSUM_LENGTH] {
        return Err(AddressError::Checksum);
    }

    raw.truncate(split);
    Ok(raw)
}

/// Decode a Base58Check string, insisting on `prefix` and a body of
/// exactly `body_len` bytes.
///
/// Checks run in a fixed order: alphabet, checksum, prefix, length.
pub fn decode_check(text: &str, prefix: &[u8], body_len: usize) -> Result<Vec<u8>, AddressError> {
    let payload = decode_check_payload(text)?;

    if !payload.starts_with(prefix) {
        let shown = payload.len().min(prefix.len());
        return Err(AddressError::AddressFormat {
            expected: hex::encode(prefix),
            actual: hex::encode(&payload[..shown]),
        });
    }

    let body = &payload[prefix.len()..];
    if body.len() != body_len {
        return Err(AddressError::InvalidLength {
            expected: body_len,
            actual: body.len(),
        });
    }

    Ok(body.to_vec())
}
