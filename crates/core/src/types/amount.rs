//! Token amounts in the chain's smallest unit.
//!
//! Prices, totals and gas prices all travel on-chain as `uint256` integers of
//! the smallest unit (wei). Clients send them either as JSON numbers or as
//! digit strings, since JSON numbers lose precision past 2^53.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Number of wei in one gwei.
const WEI_PER_GWEI: u64 = 1_000_000_000;

/// Errors produced when parsing an amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is not a valid number: {0}")]
    Invalid(String),

    #[error("amount must not be negative")]
    Negative,

    #[error("amount has more precision than the smallest unit allows")]
    Fractional,

    #[error("amount is too large")]
    Overflow,
}

/// A non-negative integer amount in the smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    /// Parse a decimal gwei figure (e.g. `"5"` or `"1.5"`) into wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a number, is negative, would
    /// need sub-wei precision, or does not fit in 128 bits.
    pub fn from_gwei_str(gwei: &str) -> Result<Self, AmountError> {
        let gwei = Decimal::from_str(gwei.trim())
            .map_err(|_| AmountError::Invalid(gwei.to_string()))?;
        if gwei.is_sign_negative() && !gwei.is_zero() {
            return Err(AmountError::Negative);
        }
        let wei = gwei
            .checked_mul(Decimal::from(WEI_PER_GWEI))
            .ok_or(AmountError::Overflow)?;
        if !wei.fract().is_zero() {
            return Err(AmountError::Fractional);
        }
        wei.to_u128().map(Self).ok_or(AmountError::Overflow)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(AmountError::Negative);
        }
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Invalid(s.to_string()));
        }
        s.parse::<u128>().map(Self).map_err(|_| AmountError::Overflow)
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<TokenAmount> for u128 {
    fn from(value: TokenAmount) -> Self {
        value.0
    }
}

// Serialized as a string so JavaScript clients keep full precision.
impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct TokenAmountVisitor;

impl de::Visitor<'_> for TokenAmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a string of digits")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(TokenAmount::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
        Ok(TokenAmount(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .map(TokenAmount::from)
            .map_err(|_| E::custom(AmountError::Negative))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // Integers past u64 arrive as floats and have already lost precision.
        if value < 0.0 {
            Err(E::custom(AmountError::Negative))
        } else if value.fract() == 0.0 {
            Err(E::custom(AmountError::Overflow))
        } else {
            Err(E::custom(AmountError::Fractional))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TokenAmountVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gwei_to_wei() {
        assert_eq!(
            TokenAmount::from_gwei_str("5").unwrap(),
            TokenAmount::new(5_000_000_000)
        );
        assert_eq!(
            TokenAmount::from_gwei_str("1.5").unwrap(),
            TokenAmount::new(1_500_000_000)
        );
        assert_eq!(TokenAmount::from_gwei_str("0").unwrap(), TokenAmount::ZERO);
    }

    #[test]
    fn test_gwei_rejects_bad_input() {
        assert_eq!(
            TokenAmount::from_gwei_str("-1"),
            Err(AmountError::Negative)
        );
        assert_eq!(
            TokenAmount::from_gwei_str("0.0000000001"),
            Err(AmountError::Fractional)
        );
        assert!(matches!(
            TokenAmount::from_gwei_str("five"),
            Err(AmountError::Invalid(_))
        ));
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: TokenAmount = serde_json::from_str("1000").unwrap();
        let from_text: TokenAmount = serde_json::from_str("\"1000\"").unwrap();
        assert_eq!(from_number, from_text);

        let large: TokenAmount =
            serde_json::from_str("\"1000000000000000000000\"").unwrap();
        assert_eq!(large.as_u128(), 1_000_000_000_000_000_000_000);
    }

    #[test]
    fn test_deserialize_rejects_non_integers() {
        assert!(serde_json::from_str::<TokenAmount>("\"12.5\"").is_err());
        assert!(serde_json::from_str::<TokenAmount>("\"-3\"").is_err());
        assert!(serde_json::from_str::<TokenAmount>("-3").is_err());
        assert!(serde_json::from_str::<TokenAmount>("12.5").is_err());
        assert!(serde_json::from_str::<TokenAmount>("true").is_err());
    }

    #[test]
    fn test_deserialize_number_inside_struct() {
        #[derive(Deserialize)]
        struct Totals {
            subtotal: TokenAmount,
            tax: TokenAmount,
        }

        let totals: Totals =
            serde_json::from_str(r#"{"subtotal": 100, "tax": "7"}"#).unwrap();
        assert_eq!(totals.subtotal, TokenAmount::new(100));
        assert_eq!(totals.tax, TokenAmount::new(7));
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&TokenAmount::new(42)).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
