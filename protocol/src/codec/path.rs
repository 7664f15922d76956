//! Payment paths.
//!
//! A path set is a list of paths, each a list of steps. Each step starts
//! with a type byte saying which of account, currency and issuer follow
//! (20 raw bytes each, no length prefix). `0xFF` separates paths and `0x00`
//! ends the set.

use serde_json::{json, Map, Value};

use super::amount::Currency;
use super::binary::{BinaryParser, BinaryWriter};
use super::CodecError;
use crate::identity::AccountId;

const STEP_ACCOUNT: u8 = 0x01;
const STEP_CURRENCY: u8 = 0x10;
const STEP_ISSUER: u8 = 0x20;
const PATH_SEPARATOR: u8 = 0xFF;
const PATH_SET_END: u8 = 0x00;

/// One hop. At least one component must be present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    fn type_byte(&self) -> u8 {
        let mut byte = 0;
        if self.account.is_some() {
            byte |= STEP_ACCOUNT;
        }
        if self.currency.is_some() {
            byte |= STEP_CURRENCY;
        }
        if self.issuer.is_some() {
            byte |= STEP_ISSUER;
        }
        byte
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        if let Some(account) = &self.account {
            map.insert("account".into(), json!(account.to_address()));
        }
        if let Some(currency) = &self.currency {
            map.insert("currency".into(), json!(currency.to_string()));
        }
        if let Some(issuer) = &self.issuer {
            map.insert("issuer".into(), json!(issuer.to_address()));
        }
        Value::Object(map)
    }
}

pub type Path = Vec<PathStep>;

/// The `Paths` field of a payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathSet(pub Vec<Path>);

impl PathSet {
    pub fn write(&self, writer: &mut BinaryWriter) -> Result<(), CodecError> {
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(CodecError::InvalidValue {
                    field: "Paths",
                    reason: "empty path".into(),
                });
            }
            if i > 0 {
                writer.write_u8(PATH_SEPARATOR);
            }
            for step in path {
                let type_byte = step.type_byte();
                if type_byte == 0 {
                    return Err(CodecError::InvalidValue {
                        field: "Paths",
                        reason: "path step with no components".into(),
                    });
                }
                writer.write_u8(type_byte);
                if let Some(account) = &step.account {
                    writer.write_bytes(account.as_bytes());
                }
                if let Some(currency) = &step.currency {
                    writer.write_bytes(currency.as_bytes());
                }
                if let Some(issuer) = &step.issuer {
                    writer.write_bytes(issuer.as_bytes());
                }
            }
        }
        writer.write_u8(PATH_SET_END);
        Ok(())
    }

    pub fn read(parser: &mut BinaryParser<'_>) -> Result<Self, CodecError> {
        let mut paths = Vec::new();
        let mut current = Vec::new();

        loop {
            let type_byte = parser.read_u8()?;
            match type_byte {
                PATH_SET_END | PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err(CodecError::InvalidValue {
                            field: "Paths",
                            reason: "empty path".into(),
                        });
                    }
                    paths.push(std::mem::take(&mut current));
                    if type_byte == PATH_SET_END {
                        return Ok(PathSet(paths));
                    }
                }
                _ => {
                    if type_byte & !(STEP_ACCOUNT | STEP_CURRENCY | STEP_ISSUER) != 0 {
                        return Err(CodecError::InvalidValue {
                            field: "Paths",
                            reason: format!("unknown path step type {:#04x}", type_byte),
                        });
                    }
                    let mut step = PathStep::default();
                    if type_byte & STEP_ACCOUNT != 0 {
                        step.account = Some(AccountId::from_bytes(parser.read_array()?));
                    }
                    if type_byte & STEP_CURRENCY != 0 {
                        step.currency = Some(Currency::from_bytes(parser.read_bytes(20)?)?);
                    }
                    if type_byte & STEP_ISSUER != 0 {
                        step.issuer = Some(AccountId::from_bytes(parser.read_array()?));
                    }
                    current.push(step);
                }
            }
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|path| Value::Array(path.iter().map(PathStep::to_json).collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PathSet {
        let gateway = AccountId::from_bytes([0x11; 20]);
        let market = AccountId::from_bytes([0x22; 20]);
        let usd = Currency::from_code("USD").unwrap();
        PathSet(vec![
            vec![PathStep {
                account: Some(gateway),
                ..Default::default()
            }],
            vec![
                PathStep {
                    currency: Some(usd),
                    issuer: Some(market),
                    ..Default::default()
                },
                PathStep {
                    account: Some(market),
                    ..Default::default()
                },
            ],
        ])
    }

    #[test]
    fn test_path_set_layout() {
        let mut writer = BinaryWriter::new();
        sample().write(&mut writer).unwrap();
        let bytes = writer.into_bytes();

        // 1 + 20 | FF | 1 + 20 + 20 | 1 + 20 | 00
        assert_eq!(bytes.len(), 21 + 1 + 41 + 21 + 1);
        assert_eq!(bytes[0], STEP_ACCOUNT);
        assert_eq!(bytes[21], PATH_SEPARATOR);
        assert_eq!(bytes[22], STEP_CURRENCY | STEP_ISSUER);
        assert_eq!(*bytes.last().unwrap(), PATH_SET_END);

        let mut parser = BinaryParser::new(&bytes);
        assert_eq!(PathSet::read(&mut parser).unwrap(), sample());
        assert!(parser.is_empty());
    }

    #[test]
    fn test_xrp_step_allowed() {
        let set = PathSet(vec![vec![PathStep {
            currency: Some(Currency::XRP),
            ..Default::default()
        }]]);
        let mut writer = BinaryWriter::new();
        set.write(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(PathSet::read(&mut BinaryParser::new(&bytes)).unwrap(), set);
    }

    #[test]
    fn test_empty_step_rejected() {
        let set = PathSet(vec![vec![PathStep::default()]]);
        assert!(set.write(&mut BinaryWriter::new()).is_err());
    }

    #[test]
    fn test_unknown_step_bits_rejected() {
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[0u8; 20]);
        bytes.push(0x00);
        assert!(PathSet::read(&mut BinaryParser::new(&bytes)).is_err());
    }

    #[test]
    fn test_missing_terminator_is_truncation() {
        let mut bytes = vec![STEP_ACCOUNT];
        bytes.extend_from_slice(&[0x33; 20]);
        assert!(matches!(
            PathSet::read(&mut BinaryParser::new(&bytes)),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_json_shape() {
        let json = sample().to_json();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1][0]["currency"], "USD");
        assert!(json[0][0].get("currency").is_none());
    }
}
