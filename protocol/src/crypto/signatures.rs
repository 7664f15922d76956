//! # Digital Signatures
//!
//! One entry point to sign, one to verify, two algorithms behind them. The
//! algorithms do not even agree on *what* gets signed:
//!
//! | algorithm | signs                                  | signature           |
//! |-----------|----------------------------------------|---------------------|
//! | secp256k1 | the 32-byte SHA512Half digest          | DER, low-S, RFC6979 |
//! | Ed25519   | the full prefixed message, unhashed    | 64 raw bytes        |
//!
//! so every call takes both the digest and the message and lets the key
//! pick. Verification dispatches on the public key's first byte (`0x02` or
//! `0x03` for secp256k1, `0xED` for Ed25519) and fails closed on anything
//! else.
//!
//! ## Strictness
//!
//! Ed25519 uses `ed25519-dalek`'s strict verification. secp256k1 signatures
//! are normalized to low-S before DER encoding; `k256` rejects high-S on
//! verify, which matches the network's canonical-signature rule.

use ed25519_dalek::{Signature as Ed25519Signature, Signer};
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as Secp256k1Signature, VerifyingKey as Secp256k1VerifyingKey};
use thiserror::Error;

use super::keys::{KeyType, PrivateKey, PublicKey};
use crate::config::ED25519_SIGNATURE_LENGTH;

/// Errors during signature operations.
///
/// Verification failures do not say which check tripped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("malformed signature bytes")]
    MalformedSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    /// The public key's tag byte names neither algorithm.
    #[error("unsupported public key format (tag {tag:#04x}, {length} bytes)")]
    UnsupportedKeyFormat { tag: u8, length: usize },

    #[error("signing failed")]
    SigningFailed,
}

/// Sign with whichever algorithm `key` belongs to.
///
/// `digest` is what secp256k1 signs; `message` is what Ed25519 signs. Pass
/// both; the unused one is ignored.
///
/// # Example
///
/// ```
/// use ripple_sign::crypto::keys::{KeyType, MasterKey};
/// use ripple_sign::crypto::{sha512_half, sign, verify};
///
/// let key = MasterKey::from_passphrase("alice", KeyType::Secp256k1)
///     .unwrap()
///     .derive(Some(0))
///     .unwrap();
/// let message = b"STX\0payload";
/// let digest = sha512_half(message);
/// let signature = sign(&key, &digest, message).unwrap();
///
/// assert!(verify(key.public_key().as_bytes(), &digest, message, &signature).is_ok());
/// ```
pub fn sign(key: &PrivateKey, digest: &[u8; 32], message: &[u8]) -> Result<Vec<u8>, SignatureError> {
    match key {
        PrivateKey::Secp256k1(signing_key) => {
            let signature: Secp256k1Signature = signing_key
                .sign_prehash(digest)
                .map_err(|_| SignatureError::SigningFailed)?;
            let signature = signature.normalize_s().unwrap_or(signature);
            Ok(signature.to_der().as_bytes().to_vec())
        }
        PrivateKey::Ed25519(signing_key) => Ok(signing_key.sign(message).to_bytes().to_vec()),
    }
}

/// Verify `signature` under a serialized public key.
///
/// Returns `Ok(())` only for a valid signature. Unknown key tags are an
/// error, never a quiet `false`.
pub fn verify(
    public_key: &[u8],
    digest: &[u8; 32],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let tag = public_key.first().copied().unwrap_or_default();
    match KeyType::from_public_key_tag(tag) {
        Some(KeyType::Secp256k1) => verify_secp256k1(public_key, digest, signature),
        Some(KeyType::Ed25519) => verify_ed25519(public_key, message, signature),
        None => Err(SignatureError::UnsupportedKeyFormat {
            tag,
            length: public_key.len(),
        }),
    }
}

/// [`verify`] for an already-parsed key.
pub fn verify_with_key(
    public_key: &PublicKey,
    digest: &[u8; 32],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    verify(public_key.as_bytes(), digest, message, signature)
}

fn verify_secp256k1(
    public_key: &[u8],
    digest: &[u8; 32],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let verifying_key = Secp256k1VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|_| SignatureError::InvalidPublicKey)?;
    let signature =
        Secp256k1Signature::from_der(signature).map_err(|_| SignatureError::MalformedSignature)?;
    verifying_key
        .verify_prehash(digest, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

fn verify_ed25519(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<(), SignatureError> {
    let point: [u8; 32] = public_key
        .get(1..)
        .and_then(|rest| rest.try_into().ok())
        .ok_or(SignatureError::InvalidPublicKey)?;
    let verifying_key =
        Ed25519VerifyingKey::from_bytes(&point).map_err(|_| SignatureError::InvalidPublicKey)?;

    if signature.len() != ED25519_SIGNATURE_LENGTH {
        return Err(SignatureError::MalformedSignature);
    }
    let signature =
        Ed25519Signature::from_slice(signature).map_err(|_| SignatureError::MalformedSignature)?;

    verifying_key
        .verify_strict(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha512_half;
    use crate::crypto::keys::MasterKey;

    fn secp_key() -> PrivateKey {
        MasterKey::from_passphrase("alice", KeyType::Secp256k1)
            .unwrap()
            .derive(Some(0))
            .unwrap()
    }

    fn ed_key() -> PrivateKey {
        MasterKey::from_passphrase("bob", KeyType::Ed25519)
            .unwrap()
            .derive(None)
            .unwrap()
    }

    #[test]
    fn test_sign_and_verify_both_algorithms() {
        let message = b"STX\0some canonical bytes";
        let digest = sha512_half(message);
        for key in [secp_key(), ed_key()] {
            let sig = sign(&key, &digest, message).unwrap();
            assert!(
                verify(key.public_key().as_bytes(), &digest, message, &sig).is_ok(),
                "{:?} failed to verify its own signature",
                key.key_type()
            );
        }
    }

    #[test]
    fn test_tampered_message_fails() {
        let message = b"STX\0original".to_vec();
        let digest = sha512_half(&message);
        for key in [secp_key(), ed_key()] {
            let sig = sign(&key, &digest, &message).unwrap();
            let mut tampered = message.clone();
            tampered[5] ^= 0x01;
            let tampered_digest = sha512_half(&tampered);
            assert_eq!(
                verify(key.public_key().as_bytes(), &tampered_digest, &tampered, &sig),
                Err(SignatureError::VerificationFailed)
            );
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let message = b"hello";
        let digest = sha512_half(message);
        let sig = sign(&secp_key(), &digest, message).unwrap();
        let other = MasterKey::from_passphrase("mallory", KeyType::Secp256k1)
            .unwrap()
            .public_key(Some(0))
            .unwrap();
        assert!(verify(other.as_bytes(), &digest, message, &sig).is_err());
    }

    #[test]
    fn test_secp256k1_is_deterministic_der() {
        let message = b"determinism";
        let digest = sha512_half(message);
        let a = sign(&secp_key(), &digest, message).unwrap();
        let b = sign(&secp_key(), &digest, message).unwrap();
        assert_eq!(a, b);
        // DER SEQUENCE tag.
        assert_eq!(a[0], 0x30);
        let parsed = Secp256k1Signature::from_der(&a).unwrap();
        assert!(parsed.normalize_s().is_none(), "signature must already be low-S");
    }

    #[test]
    fn test_ed25519_signature_length() {
        let message = b"edwards";
        let sig = sign(&ed_key(), &sha512_half(message), message).unwrap();
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn test_unknown_tag_fails_closed() {
        let mut pk = *secp_key().public_key().as_bytes();
        pk[0] = 0x05;
        let err = verify(&pk, &[0u8; 32], b"", &[0u8; 70]).unwrap_err();
        assert_eq!(err, SignatureError::UnsupportedKeyFormat { tag: 0x05, length: 33 });

        let err = verify(&[], &[0u8; 32], b"", &[]).unwrap_err();
        assert!(matches!(err, SignatureError::UnsupportedKeyFormat { .. }));
    }

    #[test]
    fn test_garbage_signature_is_malformed() {
        let key = secp_key();
        let err = verify(key.public_key().as_bytes(), &[1u8; 32], b"", &[0xFF; 10]).unwrap_err();
        assert_eq!(err, SignatureError::MalformedSignature);

        let key = ed_key();
        let err = verify(key.public_key().as_bytes(), &[1u8; 32], b"", &[0u8; 63]).unwrap_err();
        assert_eq!(err, SignatureError::MalformedSignature);
    }
}
