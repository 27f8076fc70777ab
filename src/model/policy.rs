//! The severity, score and risk policy applied by the overspending evaluator.
//!
//! None of these numbers are derived. They are policy, kept in one named table so that they can be
//! overridden in `config.json` and pinned down exactly by tests. Every threshold comparison is
//! inclusive at its lower edge: a ratio exactly at `warning_threshold` is a `Medium` alert and a
//! ratio exactly at `overspending_threshold` is `High`.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How bad an overspent category is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

serde_plain::derive_display_from_serialize!(Severity);
serde_plain::derive_fromstr_from_deserialize!(Severity);

/// A coarse banding of the spending score.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Good,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

serde_plain::derive_display_from_serialize!(RiskLevel);
serde_plain::derive_fromstr_from_deserialize!(RiskLevel);

/// Thresholds, penalties and risk bands.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Policy {
    /// Spending at or above this share of the limit is a `Medium` alert.
    pub warning_threshold: Decimal,
    /// Spending at or above this share of the limit is `High` (or `Critical`).
    pub overspending_threshold: Decimal,
    /// Overspending at or above this share of the limit is `Critical`.
    pub critical_threshold: Decimal,
    pub penalties: Penalties,
    pub risk_bands: RiskBands,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            warning_threshold: Decimal::new(8, 1),
            overspending_threshold: Decimal::new(12, 1),
            critical_threshold: Decimal::new(15, 1),
            penalties: Penalties::default(),
            risk_bands: RiskBands::default(),
        }
    }
}

impl Policy {
    /// The severity of an alert for a category that has used `ratio` of its limit, or `None` when
    /// the ratio is below the warning threshold.
    pub fn severity(&self, ratio: Decimal) -> Option<Severity> {
        if ratio >= self.overspending_threshold {
            if ratio >= self.critical_threshold {
                Some(Severity::Critical)
            } else {
                Some(Severity::High)
            }
        } else if ratio >= self.warning_threshold {
            Some(Severity::Medium)
        } else {
            None
        }
    }

    /// Starts at 100, subtracts the penalty for each alert and clamps to `[0, 100]`.
    pub fn score(&self, severities: impl IntoIterator<Item = Severity>) -> u8 {
        let deducted: u32 = severities
            .into_iter()
            .map(|s| u32::from(self.penalties.penalty(s)))
            .sum();
        let score = 100u32.saturating_sub(deducted);
        u8::try_from(score).unwrap_or(100)
    }

    pub fn risk(&self, score: u8) -> RiskLevel {
        self.risk_bands.risk(score)
    }

    /// Rejects thresholds that are not positive or not in ascending order and risk bands that are
    /// not in descending order.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.warning_threshold <= Decimal::ZERO {
            return Err(ValidationError::Threshold(format!(
                "warning_threshold must be greater than zero, got {}",
                self.warning_threshold
            )));
        }
        if self.warning_threshold >= self.overspending_threshold {
            return Err(ValidationError::Threshold(format!(
                "warning_threshold ({}) must be less than overspending_threshold ({})",
                self.warning_threshold, self.overspending_threshold
            )));
        }
        if self.overspending_threshold > self.critical_threshold {
            return Err(ValidationError::Threshold(format!(
                "overspending_threshold ({}) must not be greater than critical_threshold ({})",
                self.overspending_threshold, self.critical_threshold
            )));
        }
        self.risk_bands.validate()
    }
}

/// Points deducted from the spending score per alert.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Penalties {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            critical: 25,
            high: 15,
            medium: 5,
            low: 0,
        }
    }
}

impl Penalties {
    pub fn penalty(&self, severity: Severity) -> u8 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// The lowest score for each risk level. Anything below `medium_risk` is `High Risk`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RiskBands {
    pub good: u8,
    pub low_risk: u8,
    pub medium_risk: u8,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            good: 90,
            low_risk: 70,
            medium_risk: 40,
        }
    }
}

impl RiskBands {
    pub fn risk(&self, score: u8) -> RiskLevel {
        if score >= self.good {
            RiskLevel::Good
        } else if score >= self.low_risk {
            RiskLevel::LowRisk
        } else if score >= self.medium_risk {
            RiskLevel::MediumRisk
        } else {
            RiskLevel::HighRisk
        }
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.good > 100 {
            return Err(ValidationError::RiskBands(format!(
                "good ({}) cannot be more than 100",
                self.good
            )));
        }
        if !(self.good > self.low_risk && self.low_risk > self.medium_risk) {
            return Err(ValidationError::RiskBands(format!(
                "expected good > low_risk > medium_risk, got {} > {} > {}",
                self.good, self.low_risk, self.medium_risk
            )));
        }
        Ok(())
    }
}
