//! Groups a day's expenses by category.

use crate::model::Transactions;
use crate::rules::Rules;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// The spending in one category on one day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryAggregate {
    pub category: String,
    /// Sum of the absolute values of the expense amounts.
    pub total: Decimal,
    pub count: usize,
    /// `None` when no limit, or a zero limit, is configured.
    pub limit: Option<Decimal>,
    /// `total / limit`, or zero when there is no limit.
    pub ratio: Decimal,
}

impl CategoryAggregate {
    /// How far under the limit the category stayed. Negative when over, `None` without a limit.
    pub fn remaining(&self) -> Option<Decimal> {
        self.limit.map(|limit| limit - self.total)
    }
}

/// The result of aggregating a set of transactions.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Aggregation {
    /// One entry per category that had an expense, sorted by category name.
    pub aggregates: Vec<CategoryAggregate>,
    /// Sum of the non-negative amounts.
    pub income: Decimal,
}

impl Aggregation {
    pub fn total_spent(&self) -> Decimal {
        self.aggregates
            .iter()
            .fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.total))
    }

    pub fn expense_count(&self) -> usize {
        self.aggregates.iter().map(|a| a.count).sum()
    }
}

/// `total / limit`, saturating at `Decimal::MAX` when the quotient does not fit.
pub(crate) fn ratio(total: Decimal, limit: Decimal) -> Decimal {
    total.checked_div(limit).unwrap_or(Decimal::MAX)
}

/// Classifies each expense whose category is blank, then sums expenses per category. Income is
/// kept out of the aggregates and summed on its own.
pub fn aggregate(transactions: &Transactions, rules: &Rules) -> Aggregation {
    let mut totals: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
    let mut income = Decimal::ZERO;

    for t in transactions.data() {
        if !t.amount().is_expense() {
            income = income.saturating_add(t.amount().value());
            continue;
        }
        let category = rules.classifier().category_of(t);
        trace!("Row {} '{}' is {category}", t.row(), t.description());
        let entry = totals.entry(category).or_default();
        entry.0 = entry.0.saturating_add(t.amount().abs());
        entry.1 += 1;
    }

    let aggregates = totals
        .into_iter()
        .map(|(category, (total, count))| {
            let limit = rules
                .limits()
                .limit(category)
                .filter(|limit| !limit.is_zero());
            let ratio = limit.map_or(Decimal::ZERO, |limit| ratio(total, limit));
            CategoryAggregate {
                category: category.to_string(),
                total,
                count,
                limit,
                ratio,
            }
        })
        .collect();

    Aggregation { aggregates, income }
}
