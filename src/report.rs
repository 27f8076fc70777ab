//! Assembles the daily report from the aggregates, alerts and score.

use crate::aggregate::{aggregate, CategoryAggregate};
use crate::evaluate::{evaluate, percent, Alert};
use crate::model::{dollars, RiskLevel, RowWarning, Severity, Transactions};
use crate::rules::Rules;
use crate::unusual::{detect, UnusualTransaction};
use crate::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, info};

/// Everything known about one day of spending. Built by [`analyze`] and never modified.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    pub date: NaiveDate,
    /// Sorted by category name.
    pub aggregates: Vec<CategoryAggregate>,
    /// Most severe first.
    pub alerts: Vec<Alert>,
    pub score: u8,
    pub risk: RiskLevel,
    pub summary: Summary,
    pub recommendations: Vec<String>,
    pub unusual: Vec<UnusualTransaction>,
    /// Rows for this date, or of unknown date, that could not be read.
    pub warnings: Vec<RowWarning>,
}

/// Totals and cash flow for the day.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total_spent: Decimal,
    pub total_budget: Decimal,
    pub expense_count: usize,
    pub income: Decimal,
    /// `income - total_spent`
    pub net: Decimal,
    pub average_expense: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_expense: Option<LargestExpense>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LargestExpense {
    pub description: String,
    pub amount: Decimal,
}

/// Analyzes the transactions dated `date`. Transactions on other dates are ignored, so the whole
/// sheet can be passed in.
pub fn analyze(date: NaiveDate, transactions: &Transactions, rules: &Rules) -> Result<Report> {
    let day = transactions.on(date);
    debug!(
        "Analyzing {} transactions and {} warnings for {date}",
        day.data().len(),
        day.warnings().len()
    );

    let aggregation = aggregate(&day, rules);
    let evaluation = evaluate(&aggregation.aggregates, rules.policy())?;

    let total_spent = aggregation.total_spent();
    let expense_count = aggregation.expense_count();
    let average_expense = if expense_count == 0 {
        Decimal::ZERO
    } else {
        (total_spent / Decimal::from(expense_count)).round_dp(2)
    };
    let largest_expense = day
        .data()
        .iter()
        .filter(|t| t.amount().is_expense())
        .min_by_key(|t| t.amount())
        .map(|t| LargestExpense {
            description: t.description().to_string(),
            amount: t.amount().abs(),
        });
    let summary = Summary {
        total_spent,
        total_budget: rules.limits().total(),
        expense_count,
        income: aggregation.income,
        net: aggregation.income.saturating_sub(total_spent),
        average_expense,
        largest_expense,
    };

    let recommendations = recommendations(
        &aggregation.aggregates,
        &evaluation.alerts,
        evaluation.risk,
    );
    let unusual = detect(&day, rules);

    info!(
        "{date}: spent {} across {} categories, score {} ({})",
        dollars(total_spent),
        aggregation.aggregates.len(),
        evaluation.score,
        evaluation.risk
    );

    Ok(Report {
        date,
        aggregates: aggregation.aggregates,
        alerts: evaluation.alerts,
        score: evaluation.score,
        risk: evaluation.risk,
        summary,
        recommendations,
        unusual,
        warnings: day.warnings().to_vec(),
    })
}

impl Report {
    /// A plain-text summary. Each alert is listed on its own line, and that line is the only place
    /// its category and severity are named.
    pub fn summary_text(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Daily spending report for {}", self.date);
        let _ = writeln!(
            s,
            "Spent {} of a {} daily budget in {} transactions",
            dollars(self.summary.total_spent),
            dollars(self.summary.total_budget),
            self.summary.expense_count
        );
        let _ = writeln!(
            s,
            "Income {}, net {}",
            dollars(self.summary.income),
            dollars(self.summary.net)
        );
        let _ = writeln!(s, "Spending score {}/100 ({})", self.score, self.risk);
        if self.alerts.is_empty() {
            let _ = writeln!(s, "No categories are near their limits");
        } else {
            let _ = writeln!(s, "Alerts:");
            for alert in &self.alerts {
                let _ = writeln!(
                    s,
                    "  [{}] {} at {}% of budget",
                    alert.severity,
                    alert.category,
                    alert.percent()
                );
            }
        }
        if !self.unusual.is_empty() {
            let _ = writeln!(s, "{} unusual transactions", self.unusual.len());
        }
        if !self.warnings.is_empty() {
            let _ = writeln!(s, "{} rows could not be read", self.warnings.len());
        }
        s
    }
}

fn recommendations(
    aggregates: &[CategoryAggregate],
    alerts: &[Alert],
    risk: RiskLevel,
) -> Vec<String> {
    if aggregates.is_empty() {
        return vec![String::from("No expenses were recorded for this day.")];
    }

    let mut out = Vec::new();
    for alert in alerts {
        let aggregate = aggregates.iter().find(|a| a.category == alert.category);
        let over = aggregate
            .and_then(|a| a.remaining())
            .map(|remaining| -remaining)
            .unwrap_or_default();
        let text = match alert.severity {
            Severity::Critical => format!(
                "URGENT: {} spending is {}% of budget. Consider eliminating non-essential {} \
                 expenses immediately.",
                alert.category,
                alert.percent(),
                alert.category.to_lowercase()
            ),
            Severity::High => format!(
                "Reduce {} spending by {} to stay within budget.",
                alert.category,
                dollars(over)
            ),
            Severity::Medium | Severity::Low => format!(
                "Monitor {} spending closely, {}% of the budget is used.",
                alert.category,
                alert.percent()
            ),
        };
        out.push(text);
    }

    // The category with a limit, no alert and the lowest ratio.
    let best = aggregates
        .iter()
        .filter(|a| a.limit.is_some())
        .filter(|a| !alerts.iter().any(|alert| alert.category == a.category))
        .min_by(|a, b| a.ratio.cmp(&b.ratio));
    if let Some(best) = best {
        let saved = best.remaining().unwrap_or_default();
        out.push(format!(
            "Great job staying within budget for {} ({}% used). You saved {}.",
            best.category,
            percent(best.ratio),
            dollars(saved)
        ));
    }

    match risk {
        RiskLevel::HighRisk => out.push(String::from(
            "Consider setting a daily spending limit and tracking expenses as they happen.",
        )),
        RiskLevel::MediumRisk => out.push(String::from(
            "Review your spending categories and consider stricter limits for problem areas.",
        )),
        RiskLevel::Good | RiskLevel::LowRisk => {}
    }
    out
}
