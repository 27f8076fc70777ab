//! Types that represent the core data model, such as `Transaction`, `BudgetLimits`,
//! `MonthlyBudgets` and `Policy`.
mod amount;
mod budget;
mod monthly;
mod policy;
mod transaction;

pub use amount::{dollars, Amount, AmountError};
pub use budget::BudgetLimits;
pub use monthly::{MonthlyBudget, MonthlyBudgets};
pub use policy::{Penalties, Policy, RiskBands, RiskLevel, Severity};
pub use transaction::{RowWarning, Transaction, Transactions};
