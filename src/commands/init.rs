use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `reports` subdirectory and an initial `config.json` holding the
/// default budget, category keywords and policy.
///
/// # Arguments
/// - `home` - The directory that will be the root of the home directory, e.g. `$HOME/daily-spend`
/// - `transactions_csv` - Where the CSV export of the Transactions sheet will be saved. Defaults
///   to `transactions.csv` in the home directory.
/// - `categories_csv` - Where the CSV export of the Categories sheet will be saved. Only given
///   when daily limits should be derived from monthly budgets.
///
/// # Errors
/// - Returns an error if any file operations fail or if the home directory is already set up.
pub async fn init(
    home: &Path,
    transactions_csv: Option<&Path>,
    categories_csv: Option<&Path>,
) -> Result<Out<()>> {
    let config = Config::create(home, transactions_csv, categories_csv)
        .await
        .context("Unable to create the home directory and config")?;
    let mut message = format!(
        "Created {}. Edit it to set your budget and export your Transactions sheet to {}",
        config.config_path().display(),
        config.transactions_csv().display()
    );
    if let Some(categories) = config.categories_csv() {
        message.push_str(&format!(
            ". Daily limits will come from the monthly budgets in {}",
            categories.display()
        ));
    }
    Ok(message.into())
}
