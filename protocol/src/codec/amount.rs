//! # Amounts
//!
//! The ledger has two kinds of money and one 64-bit word to tell them apart.
//!
//! **Native (XRP)**, 8 bytes:
//!
//! ```text
//! bit 63   0  (not issued)
//! bit 62   1  (positive)
//! 61..0       drops, at most 10^17
//! ```
//!
//! **Issued currency**, 48 bytes: the 8-byte value below, then a 20-byte
//! currency code and the 20-byte issuer account.
//!
//! ```text
//! bit 63   1  (issued)
//! bit 62   sign, 1 = positive
//! 61..54      exponent + 97
//! 53..0       mantissa, normalized into [10^15, 10^16)
//! ```
//!
//! Zero is the special word `0x8000000000000000`. Values are decimal
//! floating point, so `1` is `1000000000000000e-15` and encodes as
//! `D4838D7EA4C68000`. No binary floats anywhere near money.

use serde_json::json;
use std::fmt;
use std::str::FromStr;

use super::binary::{BinaryParser, BinaryWriter};
use super::CodecError;
use crate::config::{
    MAX_ISSUED_EXPONENT, MAX_ISSUED_MANTISSA, MAX_NATIVE_DROPS, MIN_ISSUED_EXPONENT,
    MIN_ISSUED_MANTISSA,
};
use crate::identity::AccountId;

const ISSUED_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const DROPS_MASK: u64 = POSITIVE_BIT - 1;
const EXPONENT_BIAS: i32 = 97;

/// Most significant digits an issued value can carry.
const MAX_SIGNIFICANT_DIGITS: usize = 16;

/// Characters allowed in a 3-letter currency code.
const CURRENCY_SYMBOLS: &str = "?!@#$%^&*<>(){}[]|";

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// A 160-bit currency code.
///
/// Standard codes are three ASCII characters at bytes 12..15 with zeros
/// everywhere else. Anything else is a raw 40-hex-digit code. All zeros is
/// XRP, which may appear in payment paths but never in an issued amount.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency([u8; 20]);

impl Currency {
    /// The native asset's code: all zeros.
    pub const XRP: Currency = Currency([0u8; 20]);

    /// Parse `"USD"`, `"XRP"` or a 40-character hex code.
    pub fn from_code(code: &str) -> Result<Self, CodecError> {
        if code == "XRP" {
            return Ok(Self::XRP);
        }

        if code.len() == 3 {
            if !code.chars().all(is_currency_char) {
                return Err(CodecError::InvalidCurrency(code.to_string()));
            }
            let mut bytes = [0u8; 20];
            bytes[12..15].copy_from_slice(code.as_bytes());
            return Ok(Self(bytes));
        }

        if code.len() == 40 {
            let raw = hex::decode(code).map_err(|_| CodecError::InvalidCurrency(code.to_string()))?;
            return Self::from_bytes(&raw);
        }

        Err(CodecError::InvalidCurrency(code.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| CodecError::InvalidCurrency(hex::encode_upper(bytes)))?;
        Ok(Self(arr))
    }

    pub fn is_native(&self) -> bool {
        *self == Self::XRP
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The 3-letter code, if this is a standard currency.
    pub fn standard_code(&self) -> Option<&str> {
        if self.is_native() {
            return Some("XRP");
        }
        let b = &self.0;
        if b[..12].iter().any(|&x| x != 0) || b[15..].iter().any(|&x| x != 0) {
            return None;
        }
        let code = std::str::from_utf8(&b[12..15]).ok()?;
        code.chars().all(is_currency_char).then_some(code)
    }
}

fn is_currency_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || CURRENCY_SYMBOLS.contains(c)
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.standard_code() {
            Some(code) => f.write_str(code),
            None => f.write_str(&hex::encode_upper(self.0)),
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self)
    }
}

impl FromStr for Currency {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

// ---------------------------------------------------------------------------
// Issued value
// ---------------------------------------------------------------------------

/// A normalized decimal floating-point value. Zero has mantissa 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedValue {
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl IssuedValue {
    pub const ZERO: IssuedValue = IssuedValue {
        mantissa: 0,
        exponent: 0,
        negative: false,
    };

    /// Build `±mantissa × 10^exponent`, normalizing as needed.
    ///
    /// Fails if the value needs more than 16 significant digits or is too
    /// large to represent. Values too small to represent become zero.
    pub fn new(mantissa: u64, exponent: i32, negative: bool) -> Result<Self, CodecError> {
        normalize(mantissa, exponent as i64, negative)
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn to_bits(&self) -> u64 {
        if self.is_zero() {
            return ISSUED_BIT;
        }
        let mut bits = ISSUED_BIT;
        if !self.negative {
            bits |= POSITIVE_BIT;
        }
        bits |= ((self.exponent + EXPONENT_BIAS) as u64) << 54;
        bits | self.mantissa
    }

    pub fn from_bits(bits: u64) -> Result<Self, CodecError> {
        if bits & ISSUED_BIT == 0 {
            return Err(CodecError::InvalidAmount("native bit pattern in issued slot".into()));
        }
        if bits == ISSUED_BIT {
            return Ok(Self::ZERO);
        }

        let mantissa = bits & MANTISSA_MASK;
        let exponent = ((bits >> 54) & 0xFF) as i32 - EXPONENT_BIAS;
        let negative = bits & POSITIVE_BIT == 0;

        if !(MIN_ISSUED_MANTISSA..=MAX_ISSUED_MANTISSA).contains(&mantissa)
            || !(MIN_ISSUED_EXPONENT..=MAX_ISSUED_EXPONENT).contains(&exponent)
        {
            return Err(CodecError::InvalidAmount(format!(
                "non-canonical issued value {:016X}",
                bits
            )));
        }

        Ok(Self {
            mantissa,
            exponent,
            negative,
        })
    }
}

fn normalize(mut mantissa: u64, mut exponent: i64, negative: bool) -> Result<IssuedValue, CodecError> {
    if mantissa == 0 {
        return Ok(IssuedValue::ZERO);
    }

    while mantissa < MIN_ISSUED_MANTISSA {
        mantissa *= 10;
        exponent = exponent.saturating_sub(1);
    }
    while mantissa > MAX_ISSUED_MANTISSA {
        if mantissa % 10 != 0 {
            return Err(CodecError::InvalidAmount(format!(
                "more than {} significant digits",
                MAX_SIGNIFICANT_DIGITS
            )));
        }
        mantissa /= 10;
        exponent = exponent.saturating_add(1);
    }

    if exponent > MAX_ISSUED_EXPONENT as i64 {
        return Err(CodecError::InvalidAmount("issued value overflow".into()));
    }
    if exponent < MIN_ISSUED_EXPONENT as i64 {
        return Ok(IssuedValue::ZERO);
    }

    Ok(IssuedValue {
        mantissa,
        exponent: exponent as i32,
        negative,
    })
}

impl FromStr for IssuedValue {
    type Err = CodecError;

    /// Accepts `123`, `-1.5`, `0.0001`, `1e10`, `2.5E-3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CodecError::InvalidAmount(format!("not a decimal value: {:?}", s));

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (number, exp) = match unsigned.find(['e', 'E']) {
            Some(idx) => {
                let exp: i64 = unsigned[idx + 1..].parse().map_err(|_| bad())?;
                (&unsigned[..idx], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = match number.split_once('.') {
            Some((i, f)) => (i, f),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(bad());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }

        let digits: String = int_part.chars().chain(frac_part.chars()).collect();
        let mut exponent = exp
            .checked_sub(frac_part.len() as i64)
            .ok_or_else(bad)?;

        let trimmed = digits.trim_start_matches('0');
        let significant = trimmed.trim_end_matches('0');
        if significant.is_empty() {
            return Ok(Self::ZERO);
        }
        // Saturate: anything near the i64 limits is far outside the
        // representable range and lands on overflow or zero below.
        exponent = exponent.saturating_add((trimmed.len() - significant.len()) as i64);

        if significant.len() > MAX_SIGNIFICANT_DIGITS {
            return Err(CodecError::InvalidAmount(format!(
                "more than {} significant digits: {}",
                MAX_SIGNIFICANT_DIGITS, s
            )));
        }

        let mantissa: u64 = significant.parse().map_err(|_| bad())?;
        normalize(mantissa, exponent, negative)
    }
}

impl fmt::Display for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }

        let sign = if self.negative { "-" } else { "" };
        let digits = mantissa.to_string();

        if exponent >= 0 {
            if digits.len() as i32 + exponent <= 28 {
                write!(f, "{}{}{}", sign, digits, "0".repeat(exponent as usize))
            } else {
                write!(f, "{}{}e{}", sign, digits, exponent)
            }
        } else {
            let point = digits.len() as i32 + exponent;
            if point > 0 {
                let (whole, frac) = digits.split_at(point as usize);
                write!(f, "{}{}.{}", sign, whole, frac)
            } else if point > -20 {
                write!(f, "{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
            } else {
                write!(f, "{}{}e{}", sign, digits, exponent)
            }
        }
    }
}

impl fmt::Debug for IssuedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IssuedValue({})", self)
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// An issued-currency amount: value, currency and issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAmount {
    pub value: IssuedValue,
    pub currency: Currency,
    pub issuer: AccountId,
}

/// Either native drops or an issued amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Native(u64),
    Issued(IssuedAmount),
}

impl Amount {
    /// A native amount; at most 10^17 drops.
    pub fn from_drops(drops: u64) -> Result<Self, CodecError> {
        if drops > MAX_NATIVE_DROPS {
            return Err(CodecError::InvalidAmount(format!(
                "{} drops exceeds the native supply",
                drops
            )));
        }
        Ok(Amount::Native(drops))
    }

    /// An issued amount from text, e.g. `Amount::issued("12.5", "USD", issuer)`.
    pub fn issued(value: &str, currency: &str, issuer: AccountId) -> Result<Self, CodecError> {
        Ok(Amount::Issued(IssuedAmount {
            value: value.parse()?,
            currency: issued_currency(Currency::from_code(currency)?)?,
            issuer,
        }))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Native(_))
    }

    pub fn drops(&self) -> Option<u64> {
        match self {
            Amount::Native(drops) => Some(*drops),
            Amount::Issued(_) => None,
        }
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        match self {
            Amount::Native(drops) => *drops > 0,
            Amount::Issued(issued) => !issued.value.is_zero() && !issued.value.is_negative(),
        }
    }

    pub fn write(&self, writer: &mut BinaryWriter) -> Result<(), CodecError> {
        match self {
            Amount::Native(drops) => {
                if *drops > MAX_NATIVE_DROPS {
                    return Err(CodecError::InvalidAmount(format!(
                        "{} drops exceeds the native supply",
                        drops
                    )));
                }
                writer.write_u64(POSITIVE_BIT | drops);
            }
            Amount::Issued(issued) => {
                issued_currency(issued.currency)?;
                writer.write_u64(issued.value.to_bits());
                writer.write_bytes(issued.currency.as_bytes());
                writer.write_bytes(issued.issuer.as_bytes());
            }
        }
        Ok(())
    }

    pub fn read(parser: &mut BinaryParser<'_>) -> Result<Self, CodecError> {
        let bits = parser.read_u64()?;

        if bits & ISSUED_BIT == 0 {
            if bits & POSITIVE_BIT == 0 {
                return Err(CodecError::InvalidAmount("negative native amount".into()));
            }
            return Self::from_drops(bits & DROPS_MASK);
        }

        let value = IssuedValue::from_bits(bits)?;
        let currency = issued_currency(Currency::from_bytes(parser.read_bytes(20)?)?)?;
        let issuer = AccountId::from_bytes(parser.read_array()?);
        Ok(Amount::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        }))
    }

    /// JSON form: a drops string for native amounts, an object otherwise.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Amount::Native(drops) => json!(drops.to_string()),
            Amount::Issued(issued) => json!({
                "currency": issued.currency.to_string(),
                "issuer": issued.issuer.to_address(),
                "value": issued.value.to_string(),
            }),
        }
    }
}

fn issued_currency(currency: Currency) -> Result<Currency, CodecError> {
    if currency.is_native() {
        return Err(CodecError::InvalidCurrency(
            "XRP is the native asset, not an issued currency".into(),
        ));
    }
    Ok(currency)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Native(drops) => write!(f, "{} drops", drops),
            Amount::Issued(issued) => {
                write!(f, "{} {}/{}", issued.value, issued.currency, issued.issuer)
            }
        }
    }
}
