//! Text prompts for an external AI assistant. The prompts are only produced here; sending them
//! anywhere is up to the user.

use crate::model::{dollars, Transactions};
use crate::report::Report;
use crate::rules::Rules;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// At most this many individual expenses are listed in the prompt data.
const MAX_LISTED: usize = 20;

const NO_DATA: &str = "No transaction data available for analysis.";

/// The formatted report data and the prompts built around it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Prompts {
    pub data: String,
    pub analysis: String,
    pub consensus: String,
}

impl Prompts {
    /// `transactions` should be the transactions the report was built from. Only those on the
    /// report's date are listed.
    pub fn new(report: &Report, transactions: &Transactions, rules: &Rules) -> Self {
        let data = format_data(report, transactions, rules);
        Self {
            analysis: analysis_prompt(&data),
            consensus: consensus_prompt(&data),
            data,
        }
    }

    /// Both prompts in one document, for saving to a file.
    pub fn to_text(&self) -> String {
        format!(
            "=== ANALYSIS PROMPT ===\n{}\n=== CONSENSUS PROMPT ===\n{}",
            self.analysis, self.consensus
        )
    }
}

fn format_data(report: &Report, transactions: &Transactions, rules: &Rules) -> String {
    let day = transactions.on(report.date);
    if day.is_empty() {
        return NO_DATA.to_string();
    }
    let expenses: Vec<_> = day
        .data()
        .iter()
        .filter(|t| t.amount().is_expense())
        .collect();

    let mut s = String::new();
    let _ = writeln!(s, "TRANSACTION ANALYSIS DATA");
    let _ = writeln!(s, "=========================");
    let _ = writeln!(s, "Date: {}", report.date);
    let _ = writeln!(s, "Total Transactions: {}", day.data().len());
    let _ = writeln!(s, "Total Expenses: {}", expenses.len());
    let _ = writeln!(s, "Total Amount Spent: {}", dollars(report.summary.total_spent));
    let _ = writeln!(s, "Income: {}", dollars(report.summary.income));
    let _ = writeln!(s, "Spending Score: {}/100 ({})", report.score, report.risk);
    let _ = writeln!(s);
    let _ = writeln!(s, "SPENDING BY CATEGORY:");

    for aggregate in &report.aggregates {
        let average = aggregate.total / rust_decimal::Decimal::from(aggregate.count.max(1));
        let (limit, status) = match aggregate.limit {
            Some(limit) if aggregate.total > limit => (dollars(limit), "OVER BUDGET"),
            Some(limit) => (dollars(limit), "Within Budget"),
            None => (String::from("none"), "No Limit"),
        };
        let _ = writeln!(s);
        let _ = writeln!(s, "{}:", aggregate.category);
        let _ = writeln!(s, "  - Total: {}", dollars(aggregate.total));
        let _ = writeln!(s, "  - Transactions: {}", aggregate.count);
        let _ = writeln!(s, "  - Average: {}", dollars(average));
        let _ = writeln!(s, "  - Budget Limit: {limit}");
        let _ = writeln!(s, "  - Status: {status}");
    }

    let _ = writeln!(s);
    let _ = writeln!(s, "INDIVIDUAL TRANSACTIONS:");
    for t in expenses.iter().take(MAX_LISTED) {
        let _ = writeln!(
            s,
            "- {}: {} | {} | {}",
            t.date(),
            t.description(),
            dollars(t.amount().abs()),
            rules.classifier().category_of(t)
        );
    }
    if expenses.len() > MAX_LISTED {
        let _ = writeln!(s, "... and {} more transactions", expenses.len() - MAX_LISTED);
    }
    s
}

fn analysis_prompt(data: &str) -> String {
    format!(
        "Analyze the following transaction data. Focus on overspending patterns and provide \
         actionable insights.

{data}
Please analyze:
1. Spending patterns and trends
2. Categories where I'm overspending
3. Unusual or concerning transactions
4. Recommendations for budget optimization
5. Behavioral insights about my spending habits

Provide specific, actionable recommendations.
"
    )
}

fn consensus_prompt(data: &str) -> String {
    format!(
        "Get perspectives from more than one model on my spending patterns. I want to understand \
         where I'm overspending and get actionable advice.

Transaction Data:
{data}
Please get consensus on:
1. Which spending categories need immediate attention
2. What my biggest overspending risks are
3. Top 3 actionable recommendations for improving my budget
4. Whether my current spending patterns are sustainable

I need a balanced perspective that considers both analytical insights and practical advice.
"
    )
}
