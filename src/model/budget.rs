use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily budget limit per category.
///
/// A category that is missing, or whose limit is zero, has no limit configured. It still counts
/// towards totals but never raises an alert.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetLimits(BTreeMap<String, Decimal>);

impl BudgetLimits {
    pub fn new<S, I>(limits: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Decimal)>,
    {
        Self(limits.into_iter().map(|(c, l)| (c.into(), l)).collect())
    }

    /// The configured limit for `category`, if there is one. A zero limit is returned as
    /// `Some(0)`; callers decide what "no limit" means.
    pub fn limit(&self, category: &str) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    /// The sum of all limits, i.e. the total daily budget.
    pub fn total(&self) -> Decimal {
        self.0
            .values()
            .fold(Decimal::ZERO, |sum, limit| sum.saturating_add(*limit))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(c, l)| (c.as_str(), *l))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails on the first negative limit.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        match self.iter().find(|(_, limit)| *limit < Decimal::ZERO) {
            Some((category, limit)) => Err(ValidationError::NegativeLimit {
                category: category.to_string(),
                limit,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limits() {
        let limits = BudgetLimits::new([("Food & Dining", dec!(50)), ("Shopping", dec!(40))]);
        assert_eq!(limits.limit("Food & Dining"), Some(dec!(50)));
        assert_eq!(limits.limit("Travel"), None);
        assert_eq!(limits.total(), dec!(90));
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let limits = BudgetLimits::new([("Food", dec!(50)), ("Shopping", dec!(-1))]);
        let err = limits.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeLimit {
                category: "Shopping".into(),
                limit: dec!(-1),
            }
        );
    }

    #[test]
    fn test_zero_limit_is_allowed() {
        let limits = BudgetLimits::new([("Food", dec!(0))]);
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_json() {
        let limits: BudgetLimits =
            serde_json::from_str(r#"{"Food & Dining": 50.0, "Transportation": "30"}"#).unwrap();
        assert_eq!(limits.limit("Food & Dining"), Some(dec!(50)));
        assert_eq!(limits.limit("Transportation"), Some(dec!(30)));
    }

    #[test]
    fn test_total_saturates() {
        let limits = BudgetLimits::new([("Food", Decimal::MAX), ("Rent", Decimal::MAX)]);
        assert_eq!(limits.total(), Decimal::MAX);
    }
}
