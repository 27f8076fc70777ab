//! Access to the Transactions and Categories sheets. Normally this reads CSV exports of the
//! sheets; in test mode an in-memory sheet seeded with sample data is used instead.

mod csv_sheet;
mod test_sheet;

use crate::model::{MonthlyBudgets, Transactions};
use crate::rules::Rules;
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub(crate) use csv_sheet::CsvSheet;
pub(crate) use test_sheet::TestSheet;
#[cfg(test)]
pub(crate) use test_sheet::SEED_DATE;

/// The name of the Transactions tab in a Tiller sheet.
pub const TRANSACTIONS: &str = "Transactions";

/// The name of the Categories tab in a Tiller sheet, which holds the monthly budgets.
pub const CATEGORIES: &str = "Categories";

/// The environment variable that selects `Mode::Testing` when it is set and not empty.
pub const TEST_MODE_ENV: &str = "DAILY_SPEND_IN_TEST_MODE";

/// Where sheet data comes from.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Read the CSV export named in the config file.
    #[default]
    Csv,
    /// Use the in-memory seeded sheet.
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Testing` when `DAILY_SPEND_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Csv`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Csv,
        }
    }
}

/// A source of sheet rows. Each row is a list of cell values and the first row is the header.
#[async_trait::async_trait]
pub(crate) trait Sheet {
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>>;
}

/// Creates the `Sheet` implementation for `mode`.
pub(crate) fn sheet(config: &Config, mode: Mode) -> Box<dyn Sheet + Send> {
    debug!("Using {mode} sheet data");
    match mode {
        Mode::Csv => Box::new(CsvSheet::new(
            config.transactions_csv(),
            config.categories_csv(),
        )),
        Mode::Testing => Box::new(TestSheet::default()),
    }
}

/// Fetches and parses the Transactions tab.
pub(crate) async fn fetch_transactions(sheet: &mut (dyn Sheet + Send)) -> Result<Transactions> {
    let values = sheet.get(TRANSACTIONS).await?;
    debug!("Fetched {} rows from {TRANSACTIONS}", values.len());
    Transactions::parse(values).context("Unable to read the Transactions sheet")
}

/// The rules to analyze `date` with. When a Categories export is configured, the daily limits
/// are derived from its monthly budgets for the month of `date`. An export without any budgets
/// leaves the configured limits in place.
pub(crate) async fn fetch_rules(
    sheet: &mut (dyn Sheet + Send),
    config: &Config,
    date: NaiveDate,
) -> Result<Rules> {
    if config.categories_csv().is_none() {
        return Ok(config.rules().clone());
    }
    let values = sheet.get(CATEGORIES).await?;
    debug!("Fetched {} rows from {CATEGORIES}", values.len());
    let budgets =
        MonthlyBudgets::parse(values, date).context("Unable to read the Categories sheet")?;
    if budgets.is_empty() {
        warn!("No monthly budgets found in {CATEGORIES}, using the configured daily limits");
        return Ok(config.rules().clone());
    }
    config
        .rules()
        .with_monthly_budgets(&budgets, config.budget_mapping())
}
