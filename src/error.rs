use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// A problem with the static configuration (budget limits, thresholds, risk bands). These are
/// fatal: no report is produced until the configuration is fixed.
///
/// This is returned wrapped in an `anyhow::Error`, callers that need to tell a bad configuration
/// apart from an I/O failure can `downcast_ref::<ValidationError>()`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    /// A category was given a budget limit below zero.
    NegativeLimit { category: String, limit: Decimal },
    /// A threshold ratio is out of range or out of order.
    Threshold(String),
    /// The risk bands are out of range or out of order.
    RiskBands(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NegativeLimit { category, limit } => write!(
                f,
                "The budget limit for '{category}' is negative ({limit}), limits must be zero or more"
            ),
            ValidationError::Threshold(msg) => write!(f, "Invalid threshold: {msg}"),
            ValidationError::RiskBands(msg) => write!(f, "Invalid risk bands: {msg}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_downcast() {
        let e: Error = ValidationError::Threshold("warning must be positive".into()).into();
        let found = e.downcast_ref::<ValidationError>().unwrap();
        assert!(matches!(found, ValidationError::Threshold(_)));
        assert_eq!(e.to_string(), "Invalid threshold: warning must be positive");
    }
}
