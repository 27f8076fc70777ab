//! Spending over a window of several days.

use crate::model::Transactions;
use crate::stats;
use crate::Result;
use anyhow::{ensure, Context};
use chrono::{Days, NaiveDate};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The number of days analyzed when none is given.
pub const DEFAULT_DAYS: u32 = 7;

/// A least-squares slope above this many dollars per day is `Increasing`, below its negation is
/// `Decreasing`.
const SLOPE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

serde_plain::derive_display_from_serialize!(TrendDirection);
serde_plain::derive_fromstr_from_deserialize!(TrendDirection);

/// The expenses of one day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Trends {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Only days that had at least one expense, oldest first.
    pub days: Vec<DailyTotal>,
    pub average: Decimal,
    pub highest: Option<DailyTotal>,
    pub lowest: Option<DailyTotal>,
    /// Sample variance of the daily totals, `None` with fewer than two days.
    pub variance: Option<f64>,
    pub direction: TrendDirection,
    /// 100 for perfectly even spending, falling towards 0 as the day-to-day variation grows.
    pub consistency: f64,
}

/// Analyzes the `days` days ending on (and including) `end`.
pub fn trends(transactions: &Transactions, end: NaiveDate, days: u32) -> Result<Trends> {
    ensure!(days > 0, "The number of days must be at least 1");
    let start = end
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .with_context(|| format!("Unable to go back {days} days from {end}"))?;

    let mut by_date: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for t in transactions.between(start, end).data() {
        if t.amount().is_expense() {
            let entry = by_date.entry(t.date()).or_default();
            entry.0 = entry.0.saturating_add(t.amount().abs());
            entry.1 += 1;
        }
    }
    let daily: Vec<DailyTotal> = by_date
        .into_iter()
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect();

    let totals: Vec<f64> = daily
        .iter()
        .map(|d| d.total.to_f64().unwrap_or_default())
        .collect();
    let average = if daily.is_empty() {
        Decimal::ZERO
    } else {
        let sum = daily
            .iter()
            .fold(Decimal::ZERO, |sum, d| sum.saturating_add(d.total));
        sum / Decimal::from(daily.len())
    };
    // The first of equal days wins.
    let highest = daily
        .iter()
        .rev()
        .max_by(|a, b| a.total.cmp(&b.total))
        .cloned();
    let lowest = daily.iter().min_by(|a, b| a.total.cmp(&b.total)).cloned();

    Ok(Trends {
        start,
        end,
        average,
        highest,
        lowest,
        variance: stats::variance(&totals),
        direction: direction(&totals),
        consistency: consistency(&totals),
        days: daily,
    })
}

fn direction(totals: &[f64]) -> TrendDirection {
    match stats::slope(totals) {
        None => TrendDirection::InsufficientData,
        Some(slope) if slope > SLOPE_THRESHOLD => TrendDirection::Increasing,
        Some(slope) if slope < -SLOPE_THRESHOLD => TrendDirection::Decreasing,
        Some(_) => TrendDirection::Stable,
    }
}

/// `max(0, 100 - cv * 100)` where cv is the coefficient of variation. No days scores 0 and a
/// single day scores 100.
fn consistency(totals: &[f64]) -> f64 {
    let Some(mean) = stats::mean(totals) else {
        return 0.0;
    };
    let std_dev = stats::std_dev(totals).unwrap_or_default();
    if mean <= 0.0 {
        return 0.0;
    }
    let score = (100.0 - std_dev / mean * 100.0).max(0.0);
    // Two decimal places are plenty for a score.
    Decimal::from_f64(score)
        .map(|d| d.round_dp(2))
        .and_then(|d| d.to_f64())
        .unwrap_or(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transaction;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn transactions(days: &[(u32, Decimal)]) -> Transactions {
        let data = days
            .iter()
            .enumerate()
            .map(|(ix, (day, amount))| {
                Transaction::new(ix + 2, ymd(2025, 1, *day), "Spend", *amount, None)
            })
            .collect();
        Transactions::new(data, Vec::new())
    }

    #[test]
    fn test_increasing() {
        let t = transactions(&[
            (20, dec!(-100)), // outside the window
            (23, dec!(-10)),
            (24, dec!(-20)),
            (24, dec!(-5)),
            (26, dec!(-40)),
            (27, dec!(500)), // income
            (28, dec!(-60)),
            (29, dec!(-80)),
        ]);
        let trends = trends(&t, ymd(2025, 1, 29), 7).unwrap();
        assert_eq!(trends.start, ymd(2025, 1, 23));
        assert_eq!(trends.days.len(), 5);
        assert_eq!(trends.days[1].total, dec!(25));
        assert_eq!(trends.days[1].count, 2);
        assert_eq!(trends.average, dec!(43));
        assert_eq!(trends.highest.as_ref().unwrap().date, ymd(2025, 1, 29));
        assert_eq!(trends.lowest.as_ref().unwrap().date, ymd(2025, 1, 23));
        assert_eq!(trends.direction, TrendDirection::Increasing);
        assert!(trends.variance.unwrap() > 0.0);
        assert!(trends.consistency >= 0.0 && trends.consistency < 100.0);
    }

    #[test]
    fn test_stable() {
        let t = transactions(&[(27, dec!(-30)), (28, dec!(-30)), (29, dec!(-30))]);
        let trends = trends(&t, ymd(2025, 1, 29), DEFAULT_DAYS).unwrap();
        assert_eq!(trends.direction, TrendDirection::Stable);
        assert_eq!(trends.consistency, 100.0);
        assert_eq!(trends.variance, Some(0.0));
    }

    #[test]
    fn test_decreasing() {
        let t = transactions(&[(27, dec!(-90)), (28, dec!(-50)), (29, dec!(-10))]);
        let trends = trends(&t, ymd(2025, 1, 29), 3).unwrap();
        assert_eq!(trends.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_insufficient_data() {
        let t = transactions(&[(29, dec!(-30))]);
        let trends = trends(&t, ymd(2025, 1, 29), 7).unwrap();
        assert_eq!(trends.direction, TrendDirection::InsufficientData);
        assert_eq!(trends.direction.to_string(), "Insufficient Data");
        assert_eq!(trends.variance, None);
        assert_eq!(trends.consistency, 100.0);

        let empty = super::trends(&Transactions::default(), ymd(2025, 1, 29), 7).unwrap();
        assert!(empty.days.is_empty());
        assert_eq!(empty.average, Decimal::ZERO);
        assert_eq!(empty.highest, None);
        assert_eq!(empty.consistency, 0.0);
    }

    #[test]
    fn test_zero_days() {
        assert!(trends(&Transactions::default(), ymd(2025, 1, 29), 0).is_err());
    }

    #[test]
    fn test_huge_totals_saturate() {
        let t = transactions(&[(28, Decimal::MIN), (29, Decimal::MIN), (29, dec!(-1))]);
        let trends = trends(&t, ymd(2025, 1, 29), 2).unwrap();
        assert_eq!(trends.days[1].total, Decimal::MAX);
        assert_eq!(trends.average, Decimal::MAX / dec!(2));
    }
}
