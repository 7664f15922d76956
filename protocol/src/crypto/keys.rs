//! # Key Management
//!
//! Two key families share one account model:
//!
//! - **secp256k1**, grown from a family seed. The seed yields a *root* key
//!   and every account key is derived from the root plus a sequence number.
//! - **Ed25519**, where the seed is hashed once into the secret and there is
//!   no derivation at all.
//!
//! Public keys are always 33 bytes: compressed SEC1 for secp256k1, and
//! `0xED ‖ key` for Ed25519. The first byte is the only thing verification
//! looks at to pick an algorithm.
//!
//! ## Root and per-sequence derivation (secp256k1)
//!
//! ```text
//! root  = first k = SHA512Half(seed ‖ be32(i)),               i = 0, 1, …  with 0 < k < n
//! child = first k = SHA512Half(rootPub ‖ be32(seq) ‖ be32(i)), i = 0, 1, … with 0 < k < n
//! key   = (root + child) mod n
//! ```
//!
//! The rejection loop accepts on the first try with probability
//! `1 - 2^-128` or so. It is still capped at the 32-bit counter space and
//! reports [`KeyError::DerivationExhausted`] past that, a branch that will
//! never run on this planet.
//!
//! Derived keys are never cached: they are recomputed from the master key
//! on every call. Key bytes are never logged.

use ed25519_dalek::SigningKey as Ed25519SigningKey;
use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::{SigningKey as Secp256k1SigningKey, VerifyingKey as Secp256k1VerifyingKey};
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

use super::hash::{sha512_half, sha512_half_multi};
use crate::config::{
    ED25519_KEY_TAG, PREFIX_ACCOUNT_PRIVATE, PREFIX_ACCOUNT_PUBLIC, PUBLIC_KEY_LENGTH,
    SECP256K1_PRIVATE_KEY_TAG,
};
use crate::identity::base58::{decode_check, encode_check, AddressError};
use crate::identity::{AccountId, Seed};

/// Errors that can occur during key operations.
///
/// Deliberately terse about key contents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Neither algorithm recognizes these bytes as a key.
    #[error("unsupported key format ({length} bytes)")]
    UnsupportedKeyFormat { length: usize },

    #[error("invalid private key bytes")]
    InvalidPrivateKey,

    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Ed25519 keys have no per-sequence derivation.
    #[error("ed25519 keys cannot be derived for an account sequence")]
    SequenceNotSupported,

    #[error("key derivation exhausted the counter space")]
    DerivationExhausted,

    #[error(transparent)]
    Address(#[from] AddressError),
}

// ---------------------------------------------------------------------------
// Key type
// ---------------------------------------------------------------------------

/// Signature algorithm a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Secp256k1,
    Ed25519,
}

impl KeyType {
    /// Classify a serialized public key by its leading byte.
    pub fn from_public_key_tag(tag: u8) -> Option<Self> {
        match tag {
            0x02 | 0x03 => Some(KeyType::Secp256k1),
            ED25519_KEY_TAG => Some(KeyType::Ed25519),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public key
// ---------------------------------------------------------------------------

/// A validated 33-byte public key of either family.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Parse and validate serialized key bytes.
    ///
    /// The tag byte picks the family; the rest must then be a valid point
    /// for that curve.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| KeyError::UnsupportedKeyFormat { length: bytes.len() })?;

        match KeyType::from_public_key_tag(arr[0]) {
            Some(KeyType::Secp256k1) => {
                Secp256k1VerifyingKey::from_sec1_bytes(&arr)
                    .map_err(|_| KeyError::InvalidPublicKey)?;
            }
            Some(KeyType::Ed25519) => {
                let mut point = [0u8; 32];
                point.copy_from_slice(&arr[1..]);
                Ed25519VerifyingKey::from_bytes(&point).map_err(|_| KeyError::InvalidPublicKey)?;
            }
            None => return Err(KeyError::UnsupportedKeyFormat { length: bytes.len() }),
        }
        Ok(Self(arr))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_slice(&bytes)
    }

    /// Parse the `a…` Base58Check form.
    pub fn decode(text: &str) -> Result<Self, KeyError> {
        let body = decode_check(text, PREFIX_ACCOUNT_PUBLIC, PUBLIC_KEY_LENGTH)?;
        Self::from_slice(&body)
    }

    /// Render in the `a…` Base58Check form.
    pub fn encode(&self) -> String {
        encode_check(PREFIX_ACCOUNT_PUBLIC, &self.0)
    }

    pub fn key_type(&self) -> KeyType {
        if self.0[0] == ED25519_KEY_TAG {
            KeyType::Ed25519
        } else {
            KeyType::Secp256k1
        }
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// The account this key controls.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_public_key(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Private key
// ---------------------------------------------------------------------------

/// A signing key of either family.
///
/// No `Serialize` on purpose: exporting key bytes is an explicit call to
/// [`to_bytes`](Self::to_bytes) or [`encode`](Self::encode).
#[derive(Clone)]
pub enum PrivateKey {
    Secp256k1(Secp256k1SigningKey),
    Ed25519(Ed25519SigningKey),
}

impl PrivateKey {
    /// Interpret raw key bytes, picking the family from length and tag.
    ///
    /// | bytes              | family    |
    /// |--------------------|-----------|
    /// | 32                 | secp256k1 |
    /// | `0x00 ‖ 32`        | secp256k1 |
    /// | `0xED ‖ 32`        | Ed25519   |
    /// | 64 (secret ‖ pub)  | Ed25519   |
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        match bytes.len() {
            32 => Self::secp256k1_from_scalar_bytes(bytes),
            33 if bytes[0] == SECP256K1_PRIVATE_KEY_TAG => {
                Self::secp256k1_from_scalar_bytes(&bytes[1..])
            }
            33 if bytes[0] == ED25519_KEY_TAG => {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(&bytes[1..]);
                Ok(PrivateKey::Ed25519(Ed25519SigningKey::from_bytes(&secret)))
            }
            64 => {
                let mut keypair = [0u8; 64];
                keypair.copy_from_slice(bytes);
                Ed25519SigningKey::from_keypair_bytes(&keypair)
                    .map(PrivateKey::Ed25519)
                    .map_err(|_| KeyError::InvalidPrivateKey)
            }
            length => Err(KeyError::UnsupportedKeyFormat { length }),
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    /// Parse the `p…` Base58Check form (secp256k1 only).
    pub fn decode(text: &str) -> Result<Self, KeyError> {
        let body = decode_check(text, PREFIX_ACCOUNT_PRIVATE, 32)?;
        Self::secp256k1_from_scalar_bytes(&body)
    }

    /// Render in the `p…` Base58Check form. The format has no Ed25519
    /// variant, so Ed25519 keys are refused.
    pub fn encode(&self) -> Result<String, KeyError> {
        match self {
            PrivateKey::Secp256k1(key) => {
                Ok(encode_check(PREFIX_ACCOUNT_PRIVATE, key.to_bytes().as_slice()))
            }
            PrivateKey::Ed25519(_) => Err(KeyError::UnsupportedKeyFormat { length: 33 }),
        }
    }

    fn secp256k1_from_scalar_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        Secp256k1SigningKey::from_slice(bytes)
            .map(PrivateKey::Secp256k1)
            .map_err(|_| KeyError::InvalidPrivateKey)
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            PrivateKey::Secp256k1(_) => KeyType::Secp256k1,
            PrivateKey::Ed25519(_) => KeyType::Ed25519,
        }
    }

    /// The 33-byte public key, in the form that goes into `SigningPubKey`.
    pub fn public_key(&self) -> PublicKey {
        let mut out = [0u8; PUBLIC_KEY_LENGTH];
        match self {
            PrivateKey::Secp256k1(key) => {
                let point = key.verifying_key().to_encoded_point(true);
                out.copy_from_slice(point.as_bytes());
            }
            PrivateKey::Ed25519(key) => {
                out[0] = ED25519_KEY_TAG;
                out[1..].copy_from_slice(&key.verifying_key().to_bytes());
            }
        }
        PublicKey(out)
    }

    /// Export the 33-byte tagged secret (`0x00 ‖ k` or `0xED ‖ k`).
    ///
    /// Handle with care: this is the account.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        match self {
            PrivateKey::Secp256k1(key) => {
                out[0] = SECP256K1_PRIVATE_KEY_TAG;
                out[1..].copy_from_slice(key.to_bytes().as_slice());
            }
            PrivateKey::Ed25519(key) => {
                out[0] = ED25519_KEY_TAG;
                out[1..].copy_from_slice(&key.to_bytes());
            }
        }
        out
    }

    pub fn account_id(&self) -> AccountId {
        self.public_key().account_id()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?}, <redacted>)", self.key_type())
    }
}

// ---------------------------------------------------------------------------
// Master key
// ---------------------------------------------------------------------------

/// The long-lived secret an account's signing keys come from.
///
/// Immutable once built. For secp256k1 it holds the root key; account keys
/// are derived on demand with [`derive`](Self::derive). For Ed25519 the
/// root key *is* the account key.
///
/// # Examples
///
/// ```
/// use ripple_sign::crypto::keys::MasterKey;
///
/// let master = MasterKey::from_seed_str("snoPBrXtMeMyMHUVTgbuqAfg1SUTb").unwrap();
/// let account = master.account_id(Some(0)).unwrap();
/// assert_eq!(account.to_address(), "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
/// ```
#[derive(Clone)]
pub struct MasterKey {
    root: PrivateKey,
}

impl MasterKey {
    /// Grow the master key from seed entropy.
    pub fn from_seed(seed: &Seed) -> Result<Self, KeyError> {
        let root = match seed.key_type() {
            KeyType::Secp256k1 => {
                let scalar = derive_scalar(&[seed.entropy().as_slice()])?;
                PrivateKey::Secp256k1(signing_key_from_scalar(&scalar)?)
            }
            KeyType::Ed25519 => {
                let secret = sha512_half(seed.entropy());
                PrivateKey::Ed25519(Ed25519SigningKey::from_bytes(&secret))
            }
        };
        debug!(key_type = ?seed.key_type(), "master key created from seed");
        Ok(Self { root })
    }

    /// Parse an `s…` / `sEd…` seed and grow the master key from it.
    pub fn from_seed_str(text: &str) -> Result<Self, KeyError> {
        Self::from_seed(&Seed::decode(text)?)
    }

    /// Passphrase-derived master key. See [`Seed::from_passphrase`].
    pub fn from_passphrase(passphrase: &str, key_type: KeyType) -> Result<Self, KeyError> {
        Self::from_seed(&Seed::from_passphrase(passphrase, key_type))
    }

    /// Use raw key bytes as the root key.
    pub fn from_private_key(root: PrivateKey) -> Self {
        Self { root }
    }

    /// Fresh random master key. Returns the seed too, because a master key
    /// nobody can recreate is a master key nobody will ever use twice.
    pub fn generate(key_type: KeyType) -> Result<(Seed, Self), KeyError> {
        let seed = Seed::random(key_type);
        let master = Self::from_seed(&seed)?;
        Ok((seed, master))
    }

    pub fn key_type(&self) -> KeyType {
        self.root.key_type()
    }

    pub fn root_public_key(&self) -> PublicKey {
        self.root.public_key()
    }

    /// The signing key for `sequence`.
    ///
    /// `None` returns the root key unmodified (regular-key signing).
    /// `Some(n)` derives account key `n`; `Some(0)` is the standard account
    /// key for a family seed. Ed25519 keys reject `Some(_)`.
    pub fn derive(&self, sequence: Option<u32>) -> Result<PrivateKey, KeyError> {
        let sequence = match sequence {
            None => return Ok(self.root.clone()),
            Some(sequence) => sequence,
        };

        let root_key = match &self.root {
            PrivateKey::Secp256k1(key) => key,
            PrivateKey::Ed25519(_) => return Err(KeyError::SequenceNotSupported),
        };

        let root_public = self.root.public_key();
        let root_scalar: Scalar = **root_key.as_nonzero_scalar();
        let sequence_bytes = sequence.to_be_bytes();
        let child = derive_scalar(&[root_public.as_bytes().as_slice(), &sequence_bytes])?;
        let derived = root_scalar + child;

        Ok(PrivateKey::Secp256k1(signing_key_from_scalar(&derived)?))
    }

    pub fn public_key(&self, sequence: Option<u32>) -> Result<PublicKey, KeyError> {
        Ok(self.derive(sequence)?.public_key())
    }

    pub fn account_id(&self, sequence: Option<u32>) -> Result<AccountId, KeyError> {
        Ok(self.public_key(sequence)?.account_id())
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("key_type", &self.key_type())
            .field("root_public_key", &self.root_public_key())
            .finish()
    }
}

/// Rejection-sample a secp256k1 scalar from `SHA512Half(parts ‖ be32(i))`.
fn derive_scalar(parts: &[&[u8]]) -> Result<Scalar, KeyError> {
    for counter in 0..=u32::MAX {
        let counter_bytes = counter.to_be_bytes();
        let mut input: Vec<&[u8]> = parts.to_vec();
        input.push(&counter_bytes);
        let digest = sha512_half_multi(&input);

        if let Some(scalar) = scalar_in_range(&digest) {
            if counter > 0 {
                trace!(counter, "key derivation needed extra rounds");
            }
            return Ok(scalar);
        }
    }
    Err(KeyError::DerivationExhausted)
}

/// `Some` iff the big-endian value is in `(0, n)`.
fn scalar_in_range(digest: &[u8; 32]) -> Option<Scalar> {
    let repr = FieldBytes::clone_from_slice(digest);
    let scalar: Option<Scalar> = Scalar::from_repr(repr).into();
    scalar.filter(|s| *s != Scalar::ZERO)
}

fn signing_key_from_scalar(scalar: &Scalar) -> Result<Secp256k1SigningKey, KeyError> {
    Secp256k1SigningKey::from_bytes(&scalar.to_bytes()).map_err(|_| KeyError::InvalidPrivateKey)
}

/// True when `text` is an `a…` public key.
pub fn is_valid_public_key(text: &str) -> bool {
    PublicKey::decode(text).is_ok()
}

/// True when `text` is a `p…` private key.
pub fn is_valid_private_key(text: &str) -> bool {
    PrivateKey::decode(text).is_ok()
}

/// True when `private` controls `public`. Either side may be in its
/// Base58 text form or hex.
pub fn private_key_matches_public_key(private: &str, public: &str) -> bool {
    let private = PrivateKey::decode(private).or_else(|_| PrivateKey::from_hex(private));
    let public = PublicKey::decode(public).or_else(|_| PublicKey::from_hex(public));
    match (private, public) {
        (Ok(private), Ok(public)) => private.public_key() == public,
        _ => false,
    }
}
