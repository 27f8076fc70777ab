//! Where the money went over a window of days: the biggest vendors, vendors that come back, and
//! the ones that look like subscriptions.

use crate::model::Transactions;
use crate::rules::Rules;
use crate::stats;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// How many vendors are listed in `VendorAnalysis::top`.
pub const TOP_VENDORS: usize = 10;

/// A recurring vendor whose amounts have a standard deviation below this many dollars is a
/// subscription candidate.
const SUBSCRIPTION_MAX_STD_DEV: f64 = 5.0;

/// The expenses of one vendor or one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SpendingGroup {
    pub name: String,
    pub total: Decimal,
    pub count: usize,
    /// Rounded to cents.
    pub average: Decimal,
}

/// A vendor with at least two expenses in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecurringVendor {
    pub vendor: String,
    pub total: Decimal,
    pub count: usize,
    /// Sample standard deviation of the amounts.
    pub std_dev: f64,
    /// Days between the first and the last expense.
    pub span_days: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VendorAnalysis {
    /// At most `TOP_VENDORS` vendors, largest total first.
    pub top: Vec<SpendingGroup>,
    /// Sorted by vendor name.
    pub recurring: Vec<RecurringVendor>,
    /// Recurring vendors charging nearly the same amount each time.
    pub subscription_candidates: Vec<String>,
    /// Sorted by category name.
    pub categories: Vec<SpendingGroup>,
}

/// Groups the expenses from `start` to `end`, inclusive, by vendor and by category. The vendor is
/// the trimmed description.
pub fn vendors(
    transactions: &Transactions,
    start: NaiveDate,
    end: NaiveDate,
    rules: &Rules,
) -> VendorAnalysis {
    let window = transactions.between(start, end);
    let mut by_vendor: BTreeMap<&str, Vec<(NaiveDate, Decimal)>> = BTreeMap::new();
    let mut by_category: BTreeMap<&str, Vec<Decimal>> = BTreeMap::new();
    for t in window.data().iter().filter(|t| t.amount().is_expense()) {
        let vendor = t.description().trim();
        by_vendor
            .entry(vendor)
            .or_default()
            .push((t.date(), t.amount().abs()));
        by_category
            .entry(rules.classifier().category_of(t))
            .or_default()
            .push(t.amount().abs());
    }
    trace!(
        "{} vendors and {} categories from {start} to {end}",
        by_vendor.len(),
        by_category.len()
    );

    let mut top: Vec<SpendingGroup> = by_vendor
        .iter()
        .map(|(vendor, expenses)| {
            let amounts: Vec<Decimal> = expenses.iter().map(|(_, amount)| *amount).collect();
            group(vendor, &amounts)
        })
        .collect();
    // Stable, so equal totals stay in name order.
    top.sort_by(|a, b| b.total.cmp(&a.total));
    top.truncate(TOP_VENDORS);

    let recurring: Vec<RecurringVendor> = by_vendor
        .iter()
        .filter(|(_, expenses)| expenses.len() >= 2)
        .map(|(vendor, expenses)| recurring(vendor, expenses))
        .collect();
    let subscription_candidates = recurring
        .iter()
        .filter(|r| r.std_dev < SUBSCRIPTION_MAX_STD_DEV)
        .map(|r| r.vendor.clone())
        .collect();

    let categories = by_category
        .iter()
        .map(|(category, amounts)| group(category, amounts))
        .collect();

    VendorAnalysis {
        top,
        recurring,
        subscription_candidates,
        categories,
    }
}

fn group(name: &str, amounts: &[Decimal]) -> SpendingGroup {
    let total = sum(amounts);
    SpendingGroup {
        name: name.to_string(),
        total,
        count: amounts.len(),
        average: (total / Decimal::from(amounts.len().max(1))).round_dp(2),
    }
}

fn recurring(vendor: &str, expenses: &[(NaiveDate, Decimal)]) -> RecurringVendor {
    let amounts: Vec<Decimal> = expenses.iter().map(|(_, amount)| *amount).collect();
    let values: Vec<f64> = amounts
        .iter()
        .map(|a| a.to_f64().unwrap_or_default())
        .collect();
    let first = expenses.iter().map(|(date, _)| *date).min();
    let last = expenses.iter().map(|(date, _)| *date).max();
    let span_days = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_days(),
        _ => 0,
    };
    RecurringVendor {
        vendor: vendor.to_string(),
        total: sum(&amounts),
        count: expenses.len(),
        std_dev: stats::std_dev(&values).unwrap_or_default(),
        span_days,
    }
}

fn sum(amounts: &[Decimal]) -> Decimal {
    amounts
        .iter()
        .fold(Decimal::ZERO, |sum, a| sum.saturating_add(*a))
}
