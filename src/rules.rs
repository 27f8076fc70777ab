//! The budget rule table: limits, classification rules, policy and discretionary categories,
//! bundled into one immutable value that is passed into every analysis.

use crate::classify::{CategoryRule, Classifier, DEFAULT_FALLBACK};
use crate::model::{BudgetLimits, MonthlyBudgets, Policy};
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use tracing::debug;

/// Monthly budgets are spread evenly over this many days.
const DAYS_PER_MONTH: u32 = 30;

/// The daily limit for a mapped category that has neither a monthly budget nor a configured limit.
const DEFAULT_DAILY_LIMIT: u32 = 25;

/// Everything the analysis needs to know about the user's budget. Build it once with
/// [`Rules::new`], which validates it, and never mutate it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    limits: BudgetLimits,
    classifier: Classifier,
    policy: Policy,
    discretionary: Vec<String>,
}

impl Rules {
    /// Validates the limits and the policy. A negative limit or malformed thresholds are fatal
    /// and the returned error can be downcast to a `ValidationError`.
    pub fn new(
        limits: BudgetLimits,
        categories: &[CategoryRule],
        fallback: &str,
        discretionary: Vec<String>,
        policy: Policy,
    ) -> Result<Self> {
        limits.validate().context("Invalid budget limits")?;
        policy.validate().context("Invalid policy")?;
        Ok(Self {
            limits,
            classifier: Classifier::new(categories, fallback),
            policy,
            discretionary,
        })
    }

    pub fn limits(&self) -> &BudgetLimits {
        &self.limits
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Replaces the daily limits with ones derived from monthly budgets. For each entry of
    /// `mapping`, the budgets whose names contain one of its keywords are summed and divided by 30.
    /// A mapped category with no matching budget keeps its configured limit, or gets $25 when it
    /// has none. Configured limits for categories that are not mapped are kept as they are.
    pub fn with_monthly_budgets(
        &self,
        budgets: &MonthlyBudgets,
        mapping: &[CategoryRule],
    ) -> Result<Self> {
        let mut limits: Vec<(String, Decimal)> = self
            .limits
            .iter()
            .filter(|(category, _)| !mapping.iter().any(|m| m.category == *category))
            .map(|(category, limit)| (category.to_string(), limit))
            .collect();
        for m in mapping {
            let monthly = budgets.matching(&m.keywords);
            let daily = if monthly > Decimal::ZERO {
                (monthly / Decimal::from(DAYS_PER_MONTH)).round_dp(2)
            } else {
                self.limits
                    .limit(&m.category)
                    .unwrap_or_else(|| Decimal::from(DEFAULT_DAILY_LIMIT))
            };
            debug!("Daily limit for {} is {daily} (monthly budget {monthly})", m.category);
            limits.push((m.category.clone(), daily));
        }

        let limits = BudgetLimits::new(limits);
        limits
            .validate()
            .context("Invalid budget limits from monthly budgets")?;
        Ok(Self {
            limits,
            ..self.clone()
        })
    }

    /// Whether weekend spending in `category` is worth pointing out.
    pub fn is_discretionary(&self, category: &str) -> bool {
        self.discretionary.iter().any(|c| c == category)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            limits: default_limits(),
            classifier: Classifier::new(&default_categories(), DEFAULT_FALLBACK),
            policy: Policy::default(),
            discretionary: default_discretionary(),
        }
    }
}

/// The out-of-the-box category keywords, highest priority first.
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Food & Dining",
            [
                "restaurant",
                "food",
                "dining",
                "uber eats",
                "doordash",
                "grubhub",
                "starbucks",
                "coffee",
            ],
        ),
        CategoryRule::new(
            "Transportation",
            ["uber", "lyft", "gas", "parking", "metro", "bus", "taxi", "car"],
        ),
        CategoryRule::new(
            "Shopping",
            ["amazon", "target", "walmart", "shopping", "retail", "store"],
        ),
        CategoryRule::new(
            "Entertainment",
            ["netflix", "spotify", "movie", "theater", "gaming", "entertainment"],
        ),
        CategoryRule::new(
            "Utilities",
            ["electric", "water", "internet", "phone", "cable", "utility"],
        ),
        CategoryRule::new(
            "Healthcare",
            ["doctor", "pharmacy", "medical", "health", "hospital", "dental"],
        ),
        CategoryRule::new(
            "Subscriptions",
            ["subscription", "monthly", "annual", "premium", "plus"],
        ),
    ]
}

/// The out-of-the-box daily limits, in dollars.
pub fn default_limits() -> BudgetLimits {
    BudgetLimits::new([
        ("Food & Dining", Decimal::from(50)),
        ("Transportation", Decimal::from(30)),
        ("Shopping", Decimal::from(40)),
        ("Entertainment", Decimal::from(25)),
        ("Utilities", Decimal::from(15)),
        ("Healthcare", Decimal::from(20)),
        ("Subscriptions", Decimal::from(10)),
        (DEFAULT_FALLBACK, Decimal::from(35)),
    ])
}

/// Which monthly budget names feed each daily limit, matched as lowercase substrings.
pub fn default_budget_mapping() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("Food & Dining", ["food", "restaurant", "groceries", "dining"]),
        CategoryRule::new("Transportation", ["gas", "car", "transport", "fuel", "auto"]),
        CategoryRule::new("Housing", ["rent", "mortgage", "utilities", "insurance"]),
        CategoryRule::new("Shopping", ["shopping", "retail", "amazon"]),
        CategoryRule::new("Entertainment", ["entertainment", "streaming", "movies"]),
        CategoryRule::new("Healthcare", ["medical", "health", "doctor", "pharmacy"]),
        CategoryRule::new("Utilities", ["electric", "water", "internet", "phone"]),
    ]
}

pub fn default_discretionary() -> Vec<String> {
    vec!["Shopping".to_string(), "Entertainment".to_string()]
}
