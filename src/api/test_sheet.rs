//! Implements the very simple `Sheet` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a real Tiller export.

use crate::api::csv_sheet::read_rows;
use crate::api::{Sheet, CATEGORIES, TRANSACTIONS};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;

/// The date that the seed data is centered on. It is a Wednesday.
#[cfg(test)]
pub(crate) const SEED_DATE: &str = "2025-01-29";

/// An implementation of the `Sheet` trait that does not read any files. It can hold any data in
/// memory and, by default, is seeded with a week of transactions and a Categories sheet with
/// monthly budgets.
pub(crate) struct TestSheet {
    pub(crate) data: HashMap<String, Vec<Vec<String>>>,
}

impl TestSheet {
    /// Create a new `TestSheet` using `data`. The map key is sheet name and the map value is the
    /// rows of the sheet.
    pub(crate) fn new(data: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        self.data
            .get(sheet_name)
            .with_context(|| format!("Sheet '{sheet_name}' not found"))
            .cloned()
    }
}

impl Default for TestSheet {
    /// Loads seed data from this module.
    fn default() -> Self {
        let mut data = HashMap::new();
        // The seed data is constant, so it always parses.
        for (name, csv) in [(TRANSACTIONS, TRANSACTION_DATA), (CATEGORIES, CATEGORY_DATA)] {
            data.insert(name.to_string(), read_rows(csv.as_bytes()).unwrap_or_default());
        }
        Self::new(data)
    }
}

/// Seed transaction data, in the column layout of a Tiller Transactions sheet.
const TRANSACTION_DATA: &str = r##",Date,Description,Category,Amount,Account,Account #,Institution,Note
,1/29/2025,Starbucks Coffee,,-$5.50,Credit Card 1,xxxx1234,Bank A,
,1/29/2025,Expensive Restaurant,,-$85.00,Credit Card 1,xxxx1234,Bank A,team dinner
,1/29/2025,Uber Ride,,-$12.00,Credit Card 1,xxxx1234,Bank A,
,1/29/2025,Amazon Purchase,,-$45.99,Credit Card 1,xxxx1234,Bank A,
,1/29/2025,Grocery Store,Groceries,-$23.50,Credit Card 1,xxxx1234,Bank A,
,1/29/2025,Paycheck,Paycheck,"$2,150.00",Checking 1,xxxx5678,Bank A,
,1/29/2025,Venmo Payment,,pending,Checking 1,xxxx5678,Bank A,
,1/28/2025,Netflix Subscription,,-$15.49,Credit Card 1,xxxx1234,Bank A,
,1/28/2025,Blue Bottle Coffee,,-$8.50,Credit Card 1,xxxx1234,Bank A,
,1/27/2025,Shell Gas Station,,-$52.30,Credit Card 1,xxxx1234,Bank A,
,1/26/2025,Target,,-$64.12,Credit Card 1,xxxx1234,Bank A,
,1/26/2025,AMC Movie Theater,,-$31.00,Credit Card 1,xxxx1234,Bank A,
,1/25/2025,CVS Pharmacy,,-$18.25,Credit Card 1,xxxx1234,Bank A,
,1/24/2025,Comcast Internet,,-$89.99,Checking 1,xxxx5678,Bank A,
,1/23/2025,Chipotle Mexican Grill,Restaurants,-$14.85,Credit Card 1,xxxx1234,Bank A,
"##;

/// Seed monthly budgets, in the column layout of a Tiller Categories sheet.
const CATEGORY_DATA: &str = r##"Category,Group,Type,Hide From Reports,Dec 2024,Jan 2025
Restaurants,Food,Expense,,$700.00,$600.00
Groceries,Food,Expense,,$450.00,$450.00
Gas & Fuel,Auto,Expense,,$120.00,$120.00
Rent,Home,Expense,,"$2,100.00","$2,100.00"
Shopping,Shopping,Expense,,$300.00,$300.00
Pharmacy,Health,Expense,,$60.00,$60.00
Paycheck,Income,Income,,"$5,000.00","$5,000.00"
Transfers,Transfer,Transfer,,$0.00,$0.00
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fetch_transactions;
    use crate::model::MonthlyBudgets;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_seed_data() {
        let mut sheet = TestSheet::default();
        let transactions = fetch_transactions(&mut sheet).await.unwrap();
        assert_eq!(transactions.data().len(), 14);
        let warning = &transactions.warnings()[0];
        assert_eq!(warning.row, 8);

        let seed_date = NaiveDate::parse_from_str(SEED_DATE, "%Y-%m-%d").unwrap();
        assert_eq!(transactions.on(seed_date).data().len(), 6);
    }

    #[test]
    fn test_seed_categories() {
        let sheet = TestSheet::default();
        let rows = &sheet.data[CATEGORIES];
        assert_eq!(rows.len(), 9);
        let month = NaiveDate::parse_from_str(SEED_DATE, "%Y-%m-%d").unwrap();
        let budgets = MonthlyBudgets::parse(rows.clone(), month).unwrap();
        assert_eq!(budgets.data().len(), 6);
        assert_eq!(budgets.matching(&["restaurant", "groceries"]), dec!(1050));
    }

    #[tokio::test]
    async fn test_missing_sheet() {
        let mut sheet = TestSheet::new(HashMap::new());
        assert!(sheet.get(TRANSACTIONS).await.is_err());
    }
}
