//! # Transaction Variants
//!
//! One struct per transaction type holding only its type-specific fields;
//! the shared fields live in [`TransactionCommon`](super::base::TransactionCommon).
//! [`TransactionKind`] is the closed sum over all of them.
//!
//! Required fields are plain values, optional ones are `Option`s and are
//! omitted from the encoding when `None`.

use super::types::{from_array, to_array, SignerEntry, TransactionType};
use crate::codec::{Amount, CodecError, FieldId, Hash128, Hash256, PathSet, StObject};
use crate::crypto::PublicKey;
use crate::identity::AccountId;

/// Moves a variant's own fields into and out of an [`StObject`].
pub trait KindFields: Sized {
    const TRANSACTION_TYPE: TransactionType;

    fn write_fields(&self, object: &mut StObject);

    /// Take this variant's fields out of `object`. Whatever is left
    /// afterwards does not belong to the variant.
    fn read_fields(object: &mut StObject) -> Result<Self, CodecError>;
}

macro_rules! transaction_kind {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $req:ident : $req_ty:ty = $req_field:ident, )*
        }
        optional {
            $( $opt:ident : $opt_ty:ty = $opt_field:ident, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            $( pub $req: $req_ty, )*
            $( pub $opt: Option<$opt_ty>, )*
        }

        impl KindFields for $name {
            const TRANSACTION_TYPE: TransactionType = TransactionType::$name;

            fn write_fields(&self, object: &mut StObject) {
                $( object.set(FieldId::$req_field, self.$req.clone()); )*
                $( object.set_opt(FieldId::$opt_field, self.$opt.clone()); )*
            }

            fn read_fields(object: &mut StObject) -> Result<Self, CodecError> {
                Ok(Self {
                    $( $req: object.take(FieldId::$req_field)?, )*
                    $( $opt: object.take_opt(FieldId::$opt_field)?, )*
                })
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Payments and account settings
// ---------------------------------------------------------------------------

transaction_kind! {
    /// Move value from the sending account to `destination`.
    Payment {
        destination: AccountId = DESTINATION,
        amount: Amount = AMOUNT,
    }
    optional {
        send_max: Amount = SEND_MAX,
        deliver_min: Amount = DELIVER_MIN,
        paths: PathSet = PATHS,
        destination_tag: u32 = DESTINATION_TAG,
        invoice_id: Hash256 = INVOICE_ID,
    }
}

transaction_kind! {
    /// Change account-level settings. `set_flag` / `clear_flag` take the
    /// `asf*` values, e.g. [`ASF_DISABLE_MASTER`](crate::config::ASF_DISABLE_MASTER).
    #[derive(Default)]
    AccountSet {}
    optional {
        email_hash: Hash128 = EMAIL_HASH,
        wallet_locator: Hash256 = WALLET_LOCATOR,
        wallet_size: u32 = WALLET_SIZE,
        message_key: Vec<u8> = MESSAGE_KEY,
        domain: Vec<u8> = DOMAIN,
        transfer_rate: u32 = TRANSFER_RATE,
        tick_size: u8 = TICK_SIZE,
        set_flag: u32 = SET_FLAG,
        clear_flag: u32 = CLEAR_FLAG,
    }
}

transaction_kind! {
    /// Assign a regular key, or remove it when `regular_key` is `None`.
    #[derive(Default)]
    SetRegularKey {}
    optional {
        regular_key: AccountId = REGULAR_KEY,
    }
}

// ---------------------------------------------------------------------------
// Offers and trust lines
// ---------------------------------------------------------------------------

transaction_kind! {
    OfferCreate {
        taker_pays: Amount = TAKER_PAYS,
        taker_gets: Amount = TAKER_GETS,
    }
    optional {
        offer_sequence: u32 = OFFER_SEQUENCE,
        expiration: u32 = EXPIRATION,
    }
}

transaction_kind! {
    OfferCancel {
        offer_sequence: u32 = OFFER_SEQUENCE,
    }
    optional {}
}

transaction_kind! {
    TrustSet {
        limit_amount: Amount = LIMIT_AMOUNT,
    }
    optional {
        quality_in: u32 = QUALITY_IN,
        quality_out: u32 = QUALITY_OUT,
    }
}

// ---------------------------------------------------------------------------
// Escrow
// ---------------------------------------------------------------------------

transaction_kind! {
    /// Lock native value until a time or a crypto-condition releases it.
    EscrowCreate {
        destination: AccountId = DESTINATION,
        amount: Amount = AMOUNT,
    }
    optional {
        condition: Vec<u8> = CONDITION,
        cancel_after: u32 = CANCEL_AFTER,
        finish_after: u32 = FINISH_AFTER,
        destination_tag: u32 = DESTINATION_TAG,
    }
}

transaction_kind! {
    EscrowFinish {
        owner: AccountId = OWNER,
        offer_sequence: u32 = OFFER_SEQUENCE,
    }
    optional {
        condition: Vec<u8> = CONDITION,
        fulfillment: Vec<u8> = FULFILLMENT,
    }
}

transaction_kind! {
    EscrowCancel {
        owner: AccountId = OWNER,
        offer_sequence: u32 = OFFER_SEQUENCE,
    }
    optional {}
}

// ---------------------------------------------------------------------------
// Payment channels
// ---------------------------------------------------------------------------

transaction_kind! {
    PaymentChannelCreate {
        amount: Amount = AMOUNT,
        destination: AccountId = DESTINATION,
        settle_delay: u32 = SETTLE_DELAY,
        public_key: PublicKey = PUBLIC_KEY,
    }
    optional {
        cancel_after: u32 = CANCEL_AFTER,
        destination_tag: u32 = DESTINATION_TAG,
    }
}

transaction_kind! {
    PaymentChannelFund {
        channel: Hash256 = CHANNEL,
        amount: Amount = AMOUNT,
    }
    optional {
        expiration: u32 = EXPIRATION,
    }
}

transaction_kind! {
    PaymentChannelClaim {
        channel: Hash256 = CHANNEL,
    }
    optional {
        balance: Amount = BALANCE,
        amount: Amount = AMOUNT,
        signature: Vec<u8> = SIGNATURE,
        public_key: PublicKey = PUBLIC_KEY,
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

transaction_kind! {
    CheckCreate {
        destination: AccountId = DESTINATION,
        send_max: Amount = SEND_MAX,
    }
    optional {
        destination_tag: u32 = DESTINATION_TAG,
        expiration: u32 = EXPIRATION,
        invoice_id: Hash256 = INVOICE_ID,
    }
}

transaction_kind! {
    /// Redeem a check for exactly `amount` or at least `deliver_min`.
    CheckCash {
        check_id: Hash256 = CHECK_ID,
    }
    optional {
        amount: Amount = AMOUNT,
        deliver_min: Amount = DELIVER_MIN,
    }
}

transaction_kind! {
    CheckCancel {
        check_id: Hash256 = CHECK_ID,
    }
    optional {}
}

// ---------------------------------------------------------------------------
// Signer lists
// ---------------------------------------------------------------------------

/// Replace the account's signer list. An empty list with quorum 0 deletes
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerListSet {
    pub signer_quorum: u32,
    pub signer_entries: Vec<SignerEntry>,
}

impl KindFields for SignerListSet {
    const TRANSACTION_TYPE: TransactionType = TransactionType::SignerListSet;

    fn write_fields(&self, object: &mut StObject) {
        object.set(FieldId::SIGNER_QUORUM, self.signer_quorum);
        if !self.signer_entries.is_empty() {
            object.set(
                FieldId::SIGNER_ENTRIES,
                to_array(FieldId::SIGNER_ENTRY, &self.signer_entries, SignerEntry::to_object),
            );
        }
    }

    fn read_fields(object: &mut StObject) -> Result<Self, CodecError> {
        let signer_quorum = object.take(FieldId::SIGNER_QUORUM)?;
        let signer_entries = match object.take_opt::<Vec<(FieldId, StObject)>>(FieldId::SIGNER_ENTRIES)? {
            Some(items) => from_array(FieldId::SIGNER_ENTRY, items, SignerEntry::from_object)?,
            None => Vec::new(),
        };
        Ok(Self {
            signer_quorum,
            signer_entries,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

macro_rules! transaction_kind_enum {
    ($( $name:ident ),* $(,)?) => {
        /// Every transaction variant, as one closed type.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum TransactionKind {
            $( $name($name), )*
        }

        impl TransactionKind {
            pub fn transaction_type(&self) -> TransactionType {
                match self {
                    $( TransactionKind::$name(_) => TransactionType::$name, )*
                }
            }

            pub(crate) fn write_fields(&self, object: &mut StObject) {
                match self {
                    $( TransactionKind::$name(kind) => kind.write_fields(object), )*
                }
            }

            pub(crate) fn read_fields(
                transaction_type: TransactionType,
                object: &mut StObject,
            ) -> Result<Self, CodecError> {
                Ok(match transaction_type {
                    $( TransactionType::$name => TransactionKind::$name($name::read_fields(object)?), )*
                })
            }
        }

        $(
            impl From<$name> for TransactionKind {
                fn from(kind: $name) -> Self {
                    TransactionKind::$name(kind)
                }
            }
        )*
    };
}

transaction_kind_enum! {
    Payment,
    EscrowCreate,
    EscrowFinish,
    AccountSet,
    EscrowCancel,
    SetRegularKey,
    OfferCreate,
    OfferCancel,
    SignerListSet,
    PaymentChannelCreate,
    PaymentChannelFund,
    PaymentChannelClaim,
    CheckCreate,
    CheckCash,
    CheckCancel,
    TrustSet,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<K: KindFields + PartialEq + std::fmt::Debug>(kind: &K) {
        let mut object = StObject::new();
        kind.write_fields(&mut object);
        let back = K::read_fields(&mut object).unwrap();
        assert_eq!(&back, kind);
        assert!(object.is_empty(), "fields left over for {:?}", K::TRANSACTION_TYPE);
    }

    #[test]
    fn payment_fields_roundtrip() {
        roundtrip(&Payment {
            destination: AccountId::from_bytes([3; 20]),
            amount: Amount::Native(10),
            send_max: None,
            deliver_min: None,
            paths: None,
            destination_tag: Some(77),
            invoice_id: Some(Hash256([1; 32])),
        });
    }

    #[test]
    fn absent_optionals_are_not_written() {
        let mut object = StObject::new();
        SetRegularKey::default().write_fields(&mut object);
        assert!(object.is_empty());

        AccountSet {
            tick_size: Some(5),
            ..Default::default()
        }
        .write_fields(&mut object);
        assert_eq!(object.len(), 1);
    }

    #[test]
    fn missing_required_field() {
        let mut object = StObject::new();
        object.set(FieldId::OWNER, AccountId::default());
        assert_eq!(
            EscrowCancel::read_fields(&mut object),
            Err(CodecError::MissingField("OfferSequence"))
        );
    }

    #[test]
    fn signer_list_deletion_has_no_entries_field() {
        let delete = SignerListSet {
            signer_quorum: 0,
            signer_entries: vec![],
        };
        let mut object = StObject::new();
        delete.write_fields(&mut object);
        assert!(!object.contains(FieldId::SIGNER_ENTRIES));
        roundtrip(&delete);

        roundtrip(&SignerListSet {
            signer_quorum: 3,
            signer_entries: vec![
                SignerEntry::new(AccountId::from_bytes([1; 20]), 2),
                SignerEntry::new(AccountId::from_bytes([2; 20]), 1),
            ],
        });
    }

    #[test]
    fn kind_reports_its_type() {
        let kind: TransactionKind = CheckCancel {
            check_id: Hash256::default(),
        }
        .into();
        assert_eq!(kind.transaction_type(), TransactionType::CheckCancel);
        assert_eq!(
            TransactionKind::from(OfferCancel { offer_sequence: 4 }).transaction_type(),
            OfferCancel::TRANSACTION_TYPE
        );
    }
}
