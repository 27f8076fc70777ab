//! Amount type for monetary values as they appear in a Tiller sheet.
//!
//! Tiller formats amounts like `-$3,784.44`. Exports from other tools sometimes use accounting
//! parentheses, e.g. `($12.00)`, for negative values. `Amount` parses all of these into a
//! `Decimal` and always displays in the Tiller style.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a signed dollar amount. Negative values are expenses, everything else is income.
///
/// ```
/// # use daily_spend::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.00").unwrap();
/// assert!(amount.is_expense());
/// assert_eq!(amount.to_string(), "-$1,250.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The absolute value, i.e. what was spent when this is an expense.
    pub fn abs(&self) -> Decimal {
        self.0.abs()
    }

    /// Expenses are strictly negative. Zero counts as income.
    pub fn is_expense(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError(String::from("The amount is empty")));
        }

        // Accounting style: ($12.00)
        let (negative, rest) = match trimmed
            .strip_prefix('(')
            .and_then(|inner| inner.strip_suffix(')'))
        {
            Some(inner) => (true, inner.trim()),
            None => match trimmed.strip_prefix('-') {
                Some(after_minus) => (true, after_minus.trim()),
                None => (false, trimmed),
            },
        };

        let digits = rest.strip_prefix('$').unwrap_or(rest).replace(',', "");
        if negative && digits.starts_with(['-', '+']) {
            return Err(AmountError(format!(
                "Unable to parse '{s}' as an amount: the sign is given twice"
            )));
        }
        let value = Decimal::from_str(&digits)
            .map_err(|e| AmountError(format!("Unable to parse '{s}' as an amount: {e}")))?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_expense() { "-" } else { "" };
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", self.abs().to_f64().unwrap_or_default())
        )
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// Formats a bare `Decimal` the same way an `Amount` is displayed.
pub fn dollars(value: Decimal) -> String {
    Amount::new(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_tiller_expense() {
        let amount = Amount::from_str("-$3,784.44").unwrap();
        assert_eq!(amount.value(), dec!(-3784.44));
        assert!(amount.is_expense());
        assert_eq!(amount.abs(), dec!(3784.44));
    }

    #[test]
    fn test_parse_plain_income() {
        let amount = Amount::from_str("  428.00 ").unwrap();
        assert_eq!(amount.value(), dec!(428.00));
        assert!(!amount.is_expense());
    }

    #[test]
    fn test_parse_accounting_parentheses() {
        let amount = Amount::from_str("($12.50)").unwrap();
        assert_eq!(amount.value(), dec!(-12.50));
    }

    #[test]
    fn test_parse_doubled_sign() {
        assert!(Amount::from_str("-$-5.00").is_err());
        assert!(Amount::from_str("(-5)").is_err());
        assert!(Amount::from_str("(+$5)").is_err());
        assert!(Amount::from_str("- -5").is_err());
        assert_eq!(Amount::from_str("$-5.00").unwrap().value(), dec!(-5));
        assert_eq!(Amount::from_str("- $5").unwrap().value(), dec!(-5));
    }

    #[test]
    fn test_zero_is_not_an_expense() {
        let amount = Amount::from_str("$0.00").unwrap();
        assert!(!amount.is_expense());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("twelve dollars").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
        assert!(Amount::from_str("$").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec!(-60)).to_string(), "-$60.00");
        assert_eq!(Amount::new(dec!(1234567.891)).to_string(), "$1,234,567.89");
        assert_eq!(dollars(dec!(0)), "$0.00");
    }

    #[test]
    fn test_serde() {
        let amount: Amount = serde_json::from_str("\"-$5.50\"").unwrap();
        assert_eq!(amount.value(), dec!(-5.50));
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"-$5.50\"");
    }
}
