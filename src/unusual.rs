//! Flags expenses that look out of the ordinary.

use crate::model::{Severity, Transactions};
use crate::rules::Rules;
use crate::stats;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why an expense was flagged.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    /// More than two standard deviations above the mean expense.
    UnusuallyHighAmount,
    /// Another expense on the same date has exactly the same amount.
    PotentialDuplicate,
    /// A discretionary category on a Saturday or Sunday.
    WeekendDiscretionary,
}

serde_plain::derive_display_from_serialize!(Flag);
serde_plain::derive_fromstr_from_deserialize!(Flag);

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UnusualTransaction {
    pub row: usize,
    pub date: NaiveDate,
    pub description: String,
    /// The absolute amount spent.
    pub amount: Decimal,
    pub category: String,
    pub flags: Vec<Flag>,
    pub severity: Severity,
}

/// Returns the flagged expenses in sheet order. Income is ignored.
pub fn detect(transactions: &Transactions, rules: &Rules) -> Vec<UnusualTransaction> {
    let expenses: Vec<_> = transactions
        .data()
        .iter()
        .filter(|t| t.amount().is_expense())
        .collect();
    let amounts: Vec<f64> = expenses
        .iter()
        .map(|t| t.amount().abs().to_f64().unwrap_or_default())
        .collect();
    // Needs at least two expenses for a sample standard deviation.
    let high = match (stats::mean(&amounts), stats::std_dev(&amounts)) {
        (Some(mean), Some(std_dev)) => Some(mean + 2.0 * std_dev),
        _ => None,
    };

    let mut unusual = Vec::new();
    for (ix, t) in expenses.iter().enumerate() {
        let category = rules.classifier().category_of(t);
        let mut flags = Vec::new();
        if high.is_some_and(|high| amounts[ix] > high) {
            flags.push(Flag::UnusuallyHighAmount);
        }
        let duplicate = expenses.iter().enumerate().any(|(other_ix, other)| {
            other_ix != ix
                && other.date() == t.date()
                && other.amount().abs() == t.amount().abs()
        });
        if duplicate {
            flags.push(Flag::PotentialDuplicate);
        }
        if is_weekend(t.date()) && rules.is_discretionary(category) {
            flags.push(Flag::WeekendDiscretionary);
        }
        if flags.is_empty() {
            continue;
        }
        let severity = if flags.contains(&Flag::UnusuallyHighAmount) {
            Severity::High
        } else {
            Severity::Medium
        };
        unusual.push(UnusualTransaction {
            row: t.row(),
            date: t.date(),
            description: t.description().to_string(),
            amount: t.amount().abs(),
            category: category.to_string(),
            flags,
            severity,
        });
    }
    unusual
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transaction;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unusually_high() {
        // Wednesday
        let date = ymd(2025, 1, 29);
        let mut data: Vec<Transaction> = (0..9)
            .map(|i| {
                let amount = dec!(-5) - Decimal::from(i);
                Transaction::new(i + 2, date, format!("Coffee {i}"), amount, None)
            })
            .collect();
        data.push(Transaction::new(20, date, "Restaurant", dec!(-400), None));
        data.push(Transaction::new(21, date, "Paycheck", dec!(5000), None));

        let unusual = detect(&Transactions::new(data, Vec::new()), &Rules::default());
        assert_eq!(unusual.len(), 1);
        assert_eq!(unusual[0].row, 20);
        assert_eq!(unusual[0].amount, dec!(400));
        assert_eq!(unusual[0].category, "Food & Dining");
        assert_eq!(unusual[0].flags, vec![Flag::UnusuallyHighAmount]);
        assert_eq!(unusual[0].severity, Severity::High);
    }

    #[test]
    fn test_duplicate_and_weekend() {
        // Saturday
        let date = ymd(2025, 2, 1);
        let data = vec![
            Transaction::new(2, date, "Amazon", dec!(-19.99), None),
            Transaction::new(3, date, "Target", dec!(-19.99), None),
            Transaction::new(4, date, "Electric bill", dec!(-20), None),
            Transaction::new(5, ymd(2025, 2, 3), "Amazon", dec!(-19.99), None),
        ];
        let unusual = detect(&Transactions::new(data, Vec::new()), &Rules::default());
        let rows: Vec<usize> = unusual.iter().map(|u| u.row).collect();
        assert_eq!(rows, vec![2, 3]);
        assert_eq!(
            unusual[0].flags,
            vec![Flag::PotentialDuplicate, Flag::WeekendDiscretionary]
        );
        assert_eq!(unusual[0].severity, Severity::Medium);
    }

    #[test]
    fn test_single_expense_is_not_high() {
        let data = vec![Transaction::new(2, ymd(2025, 1, 29), "Rent", dec!(-2000), None)];
        assert!(detect(&Transactions::new(data, Vec::new()), &Rules::default()).is_empty());
    }

    #[test]
    fn test_flag_display() {
        assert_eq!(Flag::UnusuallyHighAmount.to_string(), "UNUSUALLY_HIGH_AMOUNT");
        assert_eq!(Flag::WeekendDiscretionary.to_string(), "WEEKEND_DISCRETIONARY");
    }
}
