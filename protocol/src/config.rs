//! # Protocol Configuration & Constants
//!
//! Every magic number the ledger hard-codes lives here. None of these are
//! tunables: they are fixed by the network, and changing any of them
//! produces transactions the ledger will reject (or, worse, accept with a
//! different meaning).

// ---------------------------------------------------------------------------
// Hash Prefixes
// ---------------------------------------------------------------------------

/// Prefix for the transaction identity hash: `"TXN\0"`.
pub const HASH_PREFIX_TRANSACTION_ID: u32 = 0x5458_4E00;

/// Prefix for the single-signer signing hash: `"STX\0"`.
pub const HASH_PREFIX_TRANSACTION_SIGN: u32 = 0x5354_5800;

/// Prefix for the per-account multi-signer hash: `"SMT\0"`.
pub const HASH_PREFIX_MULTI_SIGN: u32 = 0x534D_5400;

/// Width of every digest this crate exposes (the "half" of SHA-512).
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Base58Check type prefixes
// ---------------------------------------------------------------------------

/// Account identifiers. Encodes to the familiar leading `r`.
pub const PREFIX_ACCOUNT_ID: &[u8] = &[0x00];

/// Account (node) public keys. Leading `a`.
pub const PREFIX_ACCOUNT_PUBLIC: &[u8] = &[0x23];

/// Account private keys. Leading `p`.
pub const PREFIX_ACCOUNT_PRIVATE: &[u8] = &[0x22];

/// Family seeds for secp256k1 keys. Leading `s`.
pub const PREFIX_FAMILY_SEED: &[u8] = &[0x21];

/// Ed25519 seeds. Three bytes so the text form starts with `sEd`.
pub const PREFIX_ED25519_SEED: &[u8] = &[0x01, 0xE1, 0x4B];

/// Length of the Base58Check checksum suffix.
pub const CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Seed entropy length. Both key families grow from the same 16 bytes.
pub const SEED_LENGTH: usize = 16;

/// Account identifier length: RIPEMD-160 output.
pub const ACCOUNT_ID_LENGTH: usize = 20;

/// Compressed public key length. Ed25519 keys are padded to match with a
/// leading type tag.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// Leading byte that marks an Ed25519 public or private key.
pub const ED25519_KEY_TAG: u8 = 0xED;

/// Leading byte of a 33-byte secp256k1 private key.
pub const SECP256K1_PRIVATE_KEY_TAG: u8 = 0x00;

/// Ed25519 signatures are always this long.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Amounts & fees
// ---------------------------------------------------------------------------

/// Drops in one XRP.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Largest representable native amount: 100 billion XRP, in drops.
pub const MAX_NATIVE_DROPS: u64 = 100_000_000_000 * DROPS_PER_XRP;

/// Issued-currency mantissa lower bound (inclusive) after normalization.
pub const MIN_ISSUED_MANTISSA: u64 = 1_000_000_000_000_000;

/// Issued-currency mantissa upper bound (inclusive) after normalization.
pub const MAX_ISSUED_MANTISSA: u64 = 9_999_999_999_999_999;

/// Smallest issued-currency exponent.
pub const MIN_ISSUED_EXPONENT: i32 = -96;

/// Largest issued-currency exponent.
pub const MAX_ISSUED_EXPONENT: i32 = 80;

// ---------------------------------------------------------------------------
// Serialization limits
// ---------------------------------------------------------------------------

/// Longest variable-length field the length prefix can express.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Upper bound on entries in a signer list or a multi-signed `Signers` array.
pub const MAX_MULTI_SIGNERS: usize = 8;

// ---------------------------------------------------------------------------
// Well-known flags
// ---------------------------------------------------------------------------

/// Canonical-signature flag, set on every transaction signed here.
pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;

/// `AccountSet` flag number that disables the master key.
pub const ASF_DISABLE_MASTER: u32 = 4;

/// Format a drop count as a decimal XRP string, e.g. `1_500_000` → `"1.5"`.
///
/// Purely cosmetic. Never feed the output back into the codec.
pub fn format_drops(drops: u64) -> String {
    let whole = drops / DROPS_PER_XRP;
    let frac = drops % DROPS_PER_XRP;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:06}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
