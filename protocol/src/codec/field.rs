//! Field identifiers and the field registry.
//!
//! A field is named by `(type code, nth)`. Sorting by that pair is the
//! canonical order, so [`FieldId`] derives `Ord` with `type_code` first and
//! the rest of the codec simply keeps fields in a `BTreeMap`.

use std::fmt;

use super::CodecError;

/// Serialized type codes.
///
/// Variants are declared in ascending code order; the derived `Ord` relies
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

impl TypeCode {
    pub fn from_u8(code: u8) -> Result<Self, CodecError> {
        Ok(match code {
            1 => TypeCode::UInt16,
            2 => TypeCode::UInt32,
            3 => TypeCode::UInt64,
            4 => TypeCode::Hash128,
            5 => TypeCode::Hash256,
            6 => TypeCode::Amount,
            7 => TypeCode::Blob,
            8 => TypeCode::AccountId,
            14 => TypeCode::Object,
            15 => TypeCode::Array,
            16 => TypeCode::UInt8,
            17 => TypeCode::Hash160,
            18 => TypeCode::PathSet,
            19 => TypeCode::Vector256,
            other => return Err(CodecError::UnknownTypeCode(other)),
        })
    }
}

/// A field's `(type, nth)` pair.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub type_code: TypeCode,
    pub nth: u8,
}

impl FieldId {
    pub const fn new(type_code: TypeCode, nth: u8) -> Self {
        Self { type_code, nth }
    }

    /// Look the field up in the registry.
    pub fn definition(&self) -> Option<&'static FieldDef> {
        REGISTRY.iter().find(|def| def.id == *self)
    }

    /// Registered name, or `"Unknown"`.
    pub fn name(&self) -> &'static str {
        self.definition().map_or("Unknown", |def| def.name)
    }

    /// Whether the field is covered by signatures. Unregistered fields count
    /// as signing so nothing is silently dropped from a signing hash.
    pub fn is_signing(&self) -> bool {
        self.definition().map_or(true, |def| def.signing)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY.iter().find(|def| def.name == name).map(|def| def.id)
    }

    /// Append the 1–3 byte field header.
    ///
    /// ```text
    /// type < 16, nth < 16   [type<<4 | nth]
    /// type < 16, nth ≥ 16   [type<<4, nth]
    /// type ≥ 16, nth < 16   [nth, type]
    /// type ≥ 16, nth ≥ 16   [0, type, nth]
    /// ```
    pub fn write_header(&self, out: &mut Vec<u8>) {
        let type_code = self.type_code as u8;
        let nth = self.nth;
        match (type_code < 16, nth < 16) {
            (true, true) => out.push((type_code << 4) | nth),
            (true, false) => out.extend_from_slice(&[type_code << 4, nth]),
            (false, true) => out.extend_from_slice(&[nth, type_code]),
            (false, false) => out.extend_from_slice(&[0, type_code, nth]),
        }
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}, {})", self.name(), self.type_code, self.nth)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry entry.
#[derive(Debug)]
pub struct FieldDef {
    pub id: FieldId,
    pub name: &'static str,
    pub signing: bool,
}

macro_rules! fields {
    ($( $konst:ident = ($ty:ident, $nth:expr, $name:literal $(, $flag:ident)?); )*) => {
        impl FieldId {
            $( pub const $konst: FieldId = FieldId::new(TypeCode::$ty, $nth); )*
        }

        static REGISTRY: &[FieldDef] = &[
            $( FieldDef { id: FieldId::$konst, name: $name, signing: fields!(@signing $($flag)?) }, )*
        ];
    };
    (@signing) => { true };
    (@signing not_signing) => { false };
}

fields! {
    TRANSACTION_TYPE = (UInt16, 2, "TransactionType");
    SIGNER_WEIGHT = (UInt16, 3, "SignerWeight");

    FLAGS = (UInt32, 2, "Flags");
    SOURCE_TAG = (UInt32, 3, "SourceTag");
    SEQUENCE = (UInt32, 4, "Sequence");
    EXPIRATION = (UInt32, 10, "Expiration");
    TRANSFER_RATE = (UInt32, 11, "TransferRate");
    WALLET_SIZE = (UInt32, 12, "WalletSize");
    DESTINATION_TAG = (UInt32, 14, "DestinationTag");
    QUALITY_IN = (UInt32, 20, "QualityIn");
    QUALITY_OUT = (UInt32, 21, "QualityOut");
    OFFER_SEQUENCE = (UInt32, 25, "OfferSequence");
    LAST_LEDGER_SEQUENCE = (UInt32, 27, "LastLedgerSequence");
    SET_FLAG = (UInt32, 33, "SetFlag");
    CLEAR_FLAG = (UInt32, 34, "ClearFlag");
    SIGNER_QUORUM = (UInt32, 35, "SignerQuorum");
    CANCEL_AFTER = (UInt32, 36, "CancelAfter");
    FINISH_AFTER = (UInt32, 37, "FinishAfter");
    SETTLE_DELAY = (UInt32, 39, "SettleDelay");

    EMAIL_HASH = (Hash128, 1, "EmailHash");

    PREVIOUS_TXN_ID = (Hash256, 5, "PreviousTxnID");
    WALLET_LOCATOR = (Hash256, 7, "WalletLocator");
    ACCOUNT_TXN_ID = (Hash256, 9, "AccountTxnID");
    INVOICE_ID = (Hash256, 17, "InvoiceID");
    CHANNEL = (Hash256, 22, "Channel");
    CHECK_ID = (Hash256, 24, "CheckID");

    AMOUNT = (Amount, 1, "Amount");
    BALANCE = (Amount, 2, "Balance");
    LIMIT_AMOUNT = (Amount, 3, "LimitAmount");
    TAKER_PAYS = (Amount, 4, "TakerPays");
    TAKER_GETS = (Amount, 5, "TakerGets");
    FEE = (Amount, 8, "Fee");
    SEND_MAX = (Amount, 9, "SendMax");
    DELIVER_MIN = (Amount, 10, "DeliverMin");

    PUBLIC_KEY = (Blob, 1, "PublicKey");
    MESSAGE_KEY = (Blob, 2, "MessageKey");
    SIGNING_PUB_KEY = (Blob, 3, "SigningPubKey");
    TXN_SIGNATURE = (Blob, 4, "TxnSignature", not_signing);
    SIGNATURE = (Blob, 6, "Signature");
    DOMAIN = (Blob, 7, "Domain");
    MEMO_TYPE = (Blob, 12, "MemoType");
    MEMO_DATA = (Blob, 13, "MemoData");
    MEMO_FORMAT = (Blob, 14, "MemoFormat");
    FULFILLMENT = (Blob, 16, "Fulfillment");
    CONDITION = (Blob, 17, "Condition");

    ACCOUNT = (AccountId, 1, "Account");
    OWNER = (AccountId, 2, "Owner");
    DESTINATION = (AccountId, 3, "Destination");
    REGULAR_KEY = (AccountId, 8, "RegularKey");

    MEMO = (Object, 10, "Memo");
    SIGNER_ENTRY = (Object, 11, "SignerEntry");
    SIGNER = (Object, 16, "Signer");

    SIGNERS = (Array, 3, "Signers", not_signing);
    SIGNER_ENTRIES = (Array, 4, "SignerEntries");
    MEMOS = (Array, 9, "Memos");

    TICK_SIZE = (UInt8, 16, "TickSize");

    PATHS = (PathSet, 1, "Paths");
}
