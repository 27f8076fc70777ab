//! Compares category aggregates with their limits and scores the day.

use crate::aggregate::{ratio, CategoryAggregate};
use crate::error::ValidationError;
use crate::model::{dollars, Policy, RiskLevel, Severity};
use crate::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// A category that is at or over its warning threshold.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Alert {
    pub category: String,
    pub severity: Severity,
    pub ratio: Decimal,
    pub message: String,
}

impl Alert {
    /// The ratio as a whole percentage, e.g. `1.2` is `120`.
    pub fn percent(&self) -> Decimal {
        percent(self.ratio)
    }

    /// Presentation order: most severe first, then the highest ratio, then by name.
    fn presentation_order(&self, other: &Self) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| other.ratio.cmp(&self.ratio))
            .then_with(|| self.category.cmp(&other.category))
    }
}

/// The alerts, score and risk level for a set of aggregates.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Evaluation {
    pub alerts: Vec<Alert>,
    pub score: u8,
    pub risk: RiskLevel,
}

/// Raises an alert for each aggregate at or above the warning threshold, then derives the score
/// and risk level from the alerts. Aggregates without a limit never alert.
///
/// Fails only when an aggregate carries a negative limit.
pub fn evaluate(aggregates: &[CategoryAggregate], policy: &Policy) -> Result<Evaluation> {
    let mut alerts = Vec::new();
    for aggregate in aggregates {
        let limit = match aggregate.limit {
            Some(limit) if limit < Decimal::ZERO => {
                return Err(ValidationError::NegativeLimit {
                    category: aggregate.category.clone(),
                    limit,
                }
                .into())
            }
            Some(limit) if !limit.is_zero() => limit,
            _ => continue,
        };
        let ratio = ratio(aggregate.total, limit);
        if let Some(severity) = policy.severity(ratio) {
            debug!(
                "{} is at {}% of its limit: {severity}",
                aggregate.category,
                percent(ratio)
            );
            alerts.push(Alert {
                category: aggregate.category.clone(),
                severity,
                ratio,
                message: message(aggregate, limit, severity, ratio),
            });
        }
    }
    alerts.sort_by(Alert::presentation_order);

    let score = policy.score(alerts.iter().map(|a| a.severity));
    let risk = policy.risk(score);
    Ok(Evaluation {
        alerts,
        score,
        risk,
    })
}

/// A ratio as a whole percentage, saturating at `Decimal::MAX`.
pub(crate) fn percent(ratio: Decimal) -> Decimal {
    ratio
        .checked_mul(Decimal::ONE_HUNDRED)
        .map_or(Decimal::MAX, |p| p.round())
}

fn message(
    aggregate: &CategoryAggregate,
    limit: Decimal,
    severity: Severity,
    ratio: Decimal,
) -> String {
    let spent = dollars(aggregate.total);
    let budget = dollars(limit);
    match severity {
        Severity::Critical | Severity::High => format!(
            "Spent {spent} on {}, {}% of the {budget} daily budget ({} over)",
            aggregate.category,
            percent(ratio),
            dollars(aggregate.total - limit)
        ),
        Severity::Medium | Severity::Low => format!(
            "Spent {spent} on {}, {}% of the {budget} daily budget",
            aggregate.category,
            percent(ratio)
        ),
    }
}
