use crate::model::{Amount, RowWarning};
use crate::Result;
use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{trace, warn};

/// The monthly budget of each expense category, read from a Tiller Categories sheet.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyBudgets {
    data: Vec<MonthlyBudget>,
    warnings: Vec<RowWarning>,
}

/// One row of the Categories sheet with a budget for the selected month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthlyBudget {
    pub row: usize,
    pub category: String,
    /// Always positive.
    pub amount: Decimal,
}

impl MonthlyBudgets {
    /// Parses the rows of a Categories sheet. The first row is the header and must contain
    /// `Category`. The budget is taken from the column whose header names the month of `month`,
    /// e.g. `Jan 2025` or `1/1/2025`, or failing that from a `Monthly Budget` or `Budget` column.
    ///
    /// Income and transfer categories, hidden categories and blank or zero budgets are left out. A
    /// budget cell that cannot be read becomes a `RowWarning`.
    pub fn parse<S, R, I>(sheet_data: I, month: NaiveDate) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = sheet_data.into_iter();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .into_iter()
                .map(|s| s.into().trim().to_string())
                .collect(),
            None => bail!("An empty data set cannot be parsed into a MonthlyBudgets object"),
        };
        let Some(category_ix) = position(&headers, CATEGORY_STR) else {
            bail!("The Categories sheet has no '{CATEGORY_STR}' column")
        };
        let budget_ix = match budget_column(&headers, month) {
            Some(ix) => ix,
            None => bail!(
                "The Categories sheet has no budget column for {}",
                month.format("%b %Y")
            ),
        };
        trace!("Reading budgets from the '{}' column", headers[budget_ix]);
        let type_ix = position(&headers, TYPE_STR);
        let hide_ix = position(&headers, HIDE_FROM_REPORTS_STR);

        let mut data = Vec::new();
        let mut warnings = Vec::new();
        for (ix, row) in rows.enumerate() {
            let row_number = ix + 2;
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            let cell = |ix: usize| values.get(ix).map(|s| s.trim()).unwrap_or_default();

            let category = cell(category_ix);
            let kind = type_ix.map(cell).unwrap_or_default();
            let hidden = hide_ix.map(cell).unwrap_or_default();
            if category.is_empty()
                || kind.eq_ignore_ascii_case("income")
                || kind.eq_ignore_ascii_case("transfer")
                || hidden.eq_ignore_ascii_case("hide")
            {
                continue;
            }

            let raw = cell(budget_ix);
            if raw.is_empty() {
                continue;
            }
            match Amount::from_str(raw) {
                Ok(amount) if !amount.abs().is_zero() => data.push(MonthlyBudget {
                    row: row_number,
                    category: category.to_string(),
                    amount: amount.abs(),
                }),
                Ok(_) => {}
                Err(e) => {
                    let warning = RowWarning {
                        row: row_number,
                        date: None,
                        message: format!("{category}: {e}"),
                    };
                    warn!("Skipping Categories {warning}");
                    warnings.push(warning);
                }
            }
        }
        Ok(Self { data, warnings })
    }

    pub fn data(&self) -> &[MonthlyBudget] {
        &self.data
    }

    pub fn warnings(&self) -> &[RowWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The sum of the budgets whose category name contains any of `keywords`, ignoring case.
    pub fn matching<S: AsRef<str>>(&self, keywords: &[S]) -> Decimal {
        self.data
            .iter()
            .filter(|b| {
                let name = b.category.to_lowercase();
                keywords.iter().any(|k| {
                    let k = k.as_ref().trim().to_lowercase();
                    !k.is_empty() && name.contains(&k)
                })
            })
            .fold(Decimal::ZERO, |sum, b| sum.saturating_add(b.amount))
    }
}

fn budget_column(headers: &[String], month: NaiveDate) -> Option<usize> {
    headers
        .iter()
        .position(|h| {
            header_month(h)
                .is_some_and(|m| m.year() == month.year() && m.month() == month.month())
        })
        .or_else(|| position(headers, MONTHLY_BUDGET_STR))
        .or_else(|| position(headers, BUDGET_STR))
}

/// Reads month headers such as `Jan 2025`, `January 2025`, `1/1/2025` and `2025-01-01`.
fn header_month(header: &str) -> Option<NaiveDate> {
    let with_day = format!("1 {header}");
    NaiveDate::parse_from_str(&with_day, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(&with_day, "%d %B %Y"))
        .or_else(|_| NaiveDate::parse_from_str(header, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(header, "%Y-%m-%d"))
        .ok()
}

fn position(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

const CATEGORY_STR: &str = "Category";
const TYPE_STR: &str = "Type";
const HIDE_FROM_REPORTS_STR: &str = "Hide From Reports";
const MONTHLY_BUDGET_STR: &str = "Monthly Budget";
const BUDGET_STR: &str = "Budget";

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn jan() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 29).unwrap()
    }

    fn sheet() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Category", "Group", "Type", "Hide From Reports", "Dec 2024", "Jan 2025"],
            vec!["Restaurants", "Food", "Expense", "", "$500.00", "$600.00"],
            vec!["Groceries", "Food", "Expense", "", "$400.00", "($450.00)"],
            vec!["Paycheck", "Income", "Income", "", "$5,000.00", "$5,000.00"],
            vec!["Old Card", "Other", "Expense", "Hide", "$10.00", "$10.00"],
            vec!["Gifts", "Other", "Expense", "", "$50.00", ""],
            vec!["Pharmacy", "Health", "Expense", "", "$20.00", "n/a"],
        ]
    }

    #[test]
    fn test_parse_month_column() {
        let budgets = MonthlyBudgets::parse(sheet(), jan()).unwrap();
        let categories: Vec<&str> = budgets.data().iter().map(|b| b.category.as_str()).collect();
        assert_eq!(categories, vec!["Restaurants", "Groceries"]);
        assert_eq!(budgets.data()[0].amount, dec!(600));
        assert_eq!(budgets.data()[1].amount, dec!(450));
        assert_eq!(budgets.warnings().len(), 1);
        assert_eq!(budgets.warnings()[0].row, 7);

        let december = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
        let budgets = MonthlyBudgets::parse(sheet(), december).unwrap();
        assert_eq!(budgets.data()[0].amount, dec!(500));
        assert_eq!(budgets.data().len(), 4);
        assert!(budgets.warnings().is_empty());
    }

    #[test]
    fn test_budget_column_fallback() {
        let rows = vec![vec!["Category", "Monthly Budget"], vec!["Rent", "$2,100.00"]];
        let budgets = MonthlyBudgets::parse(rows, jan()).unwrap();
        assert_eq!(budgets.data()[0].amount, dec!(2100));

        let rows = vec![vec!["Category", "Feb 2025"], vec!["Rent", "$2,100.00"]];
        assert!(MonthlyBudgets::parse(rows, jan()).is_err());
        let rows = vec![vec!["Name", "Budget"], vec!["Rent", "$2,100.00"]];
        assert!(MonthlyBudgets::parse(rows, jan()).is_err());
    }

    #[test]
    fn test_matching() {
        let budgets = MonthlyBudgets::parse(sheet(), jan()).unwrap();
        assert_eq!(budgets.matching(&["restaurant", "GROCERIES"]), dec!(1050));
        assert_eq!(budgets.matching(&["food"]), Decimal::ZERO);
        assert_eq!(budgets.matching(&[""]), Decimal::ZERO);
    }

    #[test]
    fn test_header_month() {
        assert_eq!(header_month("Jan 2025").unwrap().month(), 1);
        assert_eq!(header_month("March 2025").unwrap().month(), 3);
        assert_eq!(header_month("2/1/2025").unwrap().month(), 2);
        assert_eq!(header_month("Budget"), None);
    }
}
