//! # Hashing Utilities
//!
//! The ledger uses exactly three hash constructions, and this module is the
//! only place they are spelled out:
//!
//! - **SHA-512Half**: the first 32 bytes of SHA-512. Every transaction hash,
//!   signing digest and key-derivation step goes through it.
//! - **Double SHA-256**: only for the 4-byte Base58Check checksum.
//! - **RIPEMD-160(SHA-256(x))**: turns a public key into a 20-byte account
//!   identifier.
//!
//! SHA-512Half is not "SHA-512/256" (that variant uses different initial
//! values). It is plain SHA-512, truncated. Mixing the two up yields hashes
//! that look perfectly plausible and match nothing on the network.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use ripple_sign::crypto::sha256;
///
/// let hash = sha256(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the first 256 bits of SHA-512 over `data`.
///
/// # Example
///
/// ```
/// use ripple_sign::crypto::sha512_half;
///
/// let digest = sha512_half(b"ledger");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    sha512_half_multi(&[data])
}

/// SHA-512Half over several slices fed in order, without concatenating them
/// into a temporary buffer first.
///
/// Used for `prefix ‖ body ‖ suffix` constructions, where the body can be
/// a sizeable encoded transaction.
pub fn sha512_half_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let full = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&full[..32]);
    output
}

/// Compute RIPEMD-160 of `data`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `RIPEMD-160(SHA-256(data))`, the account-identifier hash.
pub fn account_hash(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_sha512_half_is_truncated_sha512() {
        // SHA-512("abc") starts with ddaf35a193617aba...
        let digest = sha512_half(b"abc");
        let expected =
            hex::decode("ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a")
                .unwrap();
        assert_eq!(digest.to_vec(), expected);
    }

    #[test]
    fn test_sha512_half_multi_matches_concatenation() {
        let multi = sha512_half_multi(&[b"STX\0", b"payload", b"suffix"]);
        let single = sha512_half(b"STX\0payloadsuffix");
        assert_eq!(multi, single);
    }

    #[test]
    fn double_sha256_differs_from_single() {
        let single = sha256(b"ledger");
        let double = double_sha256(b"ledger");
        assert_ne!(single, double);
        assert_eq!(double, sha256(&single));
    }

    #[test]
    fn test_ripemd160_known_vector() {
        let hash = ripemd160(b"");
        assert_eq!(hex::encode(hash), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
    }

    #[test]
    fn test_account_hash_composes() {
        let data = b"some public key";
        assert_eq!(account_hash(data), ripemd160(&sha256(data)));
    }
}
