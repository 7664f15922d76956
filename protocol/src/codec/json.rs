//! Network JSON rendering of serialized objects.
//!
//! Field names come from the registry. UInt64 values and all binary data
//! are hex strings (uppercase), accounts are addresses, amounts follow
//! [`Amount::to_json`](super::amount::Amount::to_json), and array elements
//! are wrapped as `{"Memo": {...}}`. `TransactionType` is rendered by name
//! when it is a known code.

use serde_json::{json, Map, Value};

use super::field::FieldId;
use super::object::{FieldValue, StObject};
use crate::transaction::TransactionType;

impl StObject {
    /// Render as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (field, value) in self.iter() {
            map.insert(field.name().to_string(), field_to_json(*field, value));
        }
        Value::Object(map)
    }
}

fn field_to_json(field: FieldId, value: &FieldValue) -> Value {
    match value {
        FieldValue::UInt16(code) if field == FieldId::TRANSACTION_TYPE => {
            match TransactionType::from_code(*code) {
                Ok(kind) => json!(kind.name()),
                Err(_) => json!(code),
            }
        }
        FieldValue::UInt8(v) => json!(v),
        FieldValue::UInt16(v) => json!(v),
        FieldValue::UInt32(v) => json!(v),
        FieldValue::UInt64(v) => json!(format!("{:016X}", v)),
        FieldValue::Hash128(h) => json!(h.to_hex()),
        FieldValue::Hash256(h) => json!(h.to_hex()),
        FieldValue::Amount(a) => a.to_json(),
        FieldValue::Blob(b) => json!(hex::encode_upper(b)),
        FieldValue::Account(a) => json!(a.to_address()),
        FieldValue::Object(o) => o.to_json(),
        FieldValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|(inner, object)| {
                    let mut wrapper = Map::new();
                    wrapper.insert(inner.name().to_string(), object.to_json());
                    Value::Object(wrapper)
                })
                .collect(),
        ),
        FieldValue::PathSet(p) => p.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::amount::Amount;
    use crate::identity::AccountId;

    #[test]
    fn test_transaction_json_shape() {
        let mut memo = StObject::new();
        memo.set(FieldId::MEMO_DATA, vec![0xCA, 0xFE]);

        let mut obj = StObject::new();
        obj.set(FieldId::TRANSACTION_TYPE, 0u16);
        obj.set(FieldId::SEQUENCE, 7u32);
        obj.set(FieldId::FEE, Amount::Native(12));
        obj.set(FieldId::ACCOUNT, AccountId::default());
        obj.set(FieldId::SIGNING_PUB_KEY, vec![0xab; 3]);
        obj.set(FieldId::MEMOS, vec![(FieldId::MEMO, memo)]);

        let json = obj.to_json();
        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Sequence"], 7);
        assert_eq!(json["Fee"], "12");
        assert_eq!(json["Account"], "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
        assert_eq!(json["SigningPubKey"], "ABABAB");
        assert_eq!(json["Memos"][0]["Memo"]["MemoData"], "CAFE");
    }

    #[test]
    fn test_unknown_transaction_type_rendered_as_number() {
        let mut obj = StObject::new();
        obj.set(FieldId::TRANSACTION_TYPE, 999u16);
        assert_eq!(obj.to_json()["TransactionType"], 999);
    }
}
