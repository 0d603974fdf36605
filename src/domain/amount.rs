//! Amount handling
//!
//! Amounts travel as canonical decimal strings so that nothing is truncated
//! on the way in. Integer amounts must fit `u64`; fractional ones (fee
//! percentages) are parsed as `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Errors that can occur when converting an amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Invalid amount format: {0}")]
    Malformed(String),

    #[error("Amount does not fit u64: {0}")]
    Overflow(String),

    #[error("Amount is not an integer: {0}")]
    NotInteger(String),
}

/// Parse an unsigned integer amount
pub fn parse_uint(value: &str) -> Result<u64, AmountError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::Malformed(value.to_string()));
    }

    value
        .parse::<u64>()
        .map_err(|_| AmountError::Overflow(value.to_string()))
}

/// Parse an unsigned integer amount into its stored form
pub fn uint_to_decimal(value: &str) -> Result<Decimal, AmountError> {
    parse_uint(value).map(Decimal::from)
}

/// Read back a stored integer amount as its canonical string
pub fn decimal_to_uint(value: Decimal) -> Result<u64, AmountError> {
    if !value.fract().is_zero() {
        return Err(AmountError::NotInteger(value.to_string()));
    }
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Overflow(value.to_string()));
    }

    value
        .trunc()
        .to_u64()
        .ok_or_else(|| AmountError::Overflow(value.to_string()))
}

/// Parse a fractional amount such as a fee percentage
pub fn parse_decimal(value: &str) -> Result<Decimal, AmountError> {
    Decimal::from_str_exact(value).map_err(|_| AmountError::Malformed(value.to_string()))
}

/// Amount of a single denomination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    /// Check that the amount is a valid integer amount
    pub fn validate(&self) -> Result<(), AmountError> {
        parse_uint(&self.amount).map(|_| ())
    }
}

impl FromStr for Coin {
    type Err = AmountError;

    /// Parse the compact `<amount><denom>` form, e.g. `100stovg`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| AmountError::Malformed(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        parse_uint(amount)?;

        Ok(Coin::new(denom, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint("0"), Ok(0));
        assert_eq!(parse_uint("10000123"), Ok(10_000_123));
        assert_eq!(parse_uint("18446744073709551615"), Ok(u64::MAX));
    }

    #[test]
    fn test_parse_uint_errors() {
        assert!(matches!(parse_uint(""), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_uint("-1"), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_uint("1.5"), Err(AmountError::Malformed(_))));
        assert!(matches!(
            parse_uint("18446744073709551616"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_decimal_to_uint() {
        assert_eq!(decimal_to_uint(dec!(1000000)), Ok(1_000_000));
        assert!(matches!(
            decimal_to_uint(dec!(1.5)),
            Err(AmountError::NotInteger(_))
        ));
        assert!(matches!(
            decimal_to_uint(dec!(-3)),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!(
            decimal_to_uint(dec!(18446744073709551616)),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_parse_decimal_keeps_scale() {
        let fee = parse_decimal("0.010").unwrap();
        assert_eq!(fee.to_string(), "0.010");
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn test_coin_from_str() {
        let coin: Coin = "100stovg".parse().unwrap();
        assert_eq!(coin, Coin::new("stovg", "100"));
        assert!("stovg".parse::<Coin>().is_err());
        assert!("100".parse::<Coin>().is_err());
    }
}
