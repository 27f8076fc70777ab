//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::SEED_DATE;
use crate::Config;
use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

/// Test environment that sets up a daily-spend home directory with the default Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a default Config and an empty reports directory.
    pub async fn new() -> Self {
        Self::create(None).await
    }

    /// Like `new`, but the Config also names a Categories export, so daily limits come from
    /// monthly budgets.
    pub async fn with_monthly_budgets() -> Self {
        Self::create(Some(Path::new("categories.csv"))).await
    }

    async fn create(categories_csv: Option<&Path>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("daily-spend");
        let config = Config::create(&root, None, categories_csv).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }
}

/// The date the seeded test sheet is centered on.
pub fn seed_date() -> NaiveDate {
    NaiveDate::parse_from_str(SEED_DATE, "%Y-%m-%d").unwrap()
}
