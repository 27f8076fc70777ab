//! Configuration file handling for daily-spend.
//!
//! The configuration file is stored at `$DAILY_SPEND_HOME/config.json` and contains the budget
//! limits, the ordered category keywords, the severity policy and the locations of the exported
//! Transactions sheet and, optionally, the Categories sheet with monthly budgets.

use crate::archive::Archive;
use crate::classify::{CategoryRule, DEFAULT_FALLBACK};
use crate::model::{BudgetLimits, Policy};
use crate::rules::{
    default_budget_mapping, default_categories, default_discretionary, default_limits, Rules,
};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "daily-spend";
const CONFIG_VERSION: u8 = 1;
const REPORT_COPIES: u32 = 30;
const REPORTS: &str = "reports";
const CONFIG_JSON: &str = "config.json";
const TRANSACTIONS_CSV: &str = "transactions.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$DAILY_SPEND_HOME` and from there it loads `$DAILY_SPEND_HOME/config.json`. It
/// provides the validated `Rules` and the paths of items that are expected in a certain location
/// within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    reports: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    rules: Rules,
}

impl Config {
    /// Creates the home directory, its `reports` subdirectory and an initial `config.json` holding
    /// the default budget.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/daily-spend`
    /// - `transactions_csv` - Where the exported Transactions sheet will be found. Defaults to
    ///   `transactions.csv` in the home directory.
    /// - `categories_csv` - Where the exported Categories sheet will be found. When given, daily
    ///   limits are derived from its monthly budgets.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if `config.json` already exists.
    pub async fn create(
        dir: impl Into<PathBuf>,
        transactions_csv: Option<&Path>,
        categories_csv: Option<&Path>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the daily-spend home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        let reports = root.join(REPORTS);
        utils::make_dir(&reports).await?;

        let mut config_file = ConfigFile::default();
        if let Some(csv) = transactions_csv {
            config_file.transactions_csv = csv.to_path_buf();
        }
        config_file.categories_csv = categories_csv.map(Path::to_path_buf);
        config_file.save(&config_path).await?;
        let rules = config_file.rules()?;

        Ok(Self {
            root,
            reports,
            config_path,
            config_file,
            rules,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file and validate its budget and policy
    /// - validate that the reports directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The daily-spend home directory is missing, run 'daily-spend init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let rules = config_file
            .rules()
            .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;
        debug!(
            "Loaded {} budget limits and {} category rules",
            rules.limits().len(),
            config_file.categories.len()
        );

        let reports = root.join(REPORTS);
        if !reports.is_dir() {
            bail!("The reports directory is missing '{}'", reports.display())
        }

        Ok(Self {
            root,
            reports,
            config_path,
            config_file,
            rules,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn reports(&self) -> &Path {
        &self.reports
    }

    pub fn report_copies(&self) -> u32 {
        self.config_file.report_copies
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Which monthly budget names feed each daily limit when `categories_csv` is set.
    pub fn budget_mapping(&self) -> &[CategoryRule] {
        &self.config_file.budget_mapping
    }

    /// Returns the stored `transactions_csv` if it is absolute, otherwise resolves it relative to
    /// the home directory.
    pub fn transactions_csv(&self) -> PathBuf {
        self.resolve(&self.config_file.transactions_csv)
    }

    /// The exported Categories sheet, resolved like `transactions_csv`, or `None` when daily limits
    /// come from `budget_limits` alone.
    pub fn categories_csv(&self) -> Option<PathBuf> {
        self.config_file
            .categories_csv
            .as_ref()
            .map(|p| self.resolve(p))
    }

    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }

    /// Creates a new `Archive` instance for saving reports.
    pub fn archive(&self) -> Archive {
        Archive::new(self)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "daily-spend",
///   "config_version": 1,
///   "transactions_csv": "transactions.csv",
///   "report_copies": 30,
///   "categories_csv": "categories.csv",
///   "budget_limits": { "Food & Dining": "50", "Miscellaneous": "35" },
///   "categories": [
///     { "category": "Food & Dining", "keywords": ["restaurant", "coffee"] }
///   ],
///   "fallback_category": "Miscellaneous",
///   "discretionary_categories": ["Shopping", "Entertainment"],
///   "policy": { "warning_threshold": "0.8" },
///   "budget_mapping": [
///     { "category": "Food & Dining", "keywords": ["food", "restaurant", "groceries"] }
///   ]
/// }
/// ```
///
/// Everything after `report_copies` may be left out, in which case the defaults apply.
/// `categories_csv` is absent unless daily limits should come from monthly budgets.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "daily-spend"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the CSV export of the Transactions sheet, relative to the home directory or
    /// absolute
    transactions_csv: PathBuf,

    /// Number of report (and prompt) files to keep, at least 1
    report_copies: u32,

    /// Path to the CSV export of the Categories sheet holding monthly budgets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categories_csv: Option<PathBuf>,

    /// Daily budget limit per category
    #[serde(default = "default_limits")]
    budget_limits: BudgetLimits,

    /// Keywords per category, highest priority first
    #[serde(default = "default_categories")]
    categories: Vec<CategoryRule>,

    /// The category for descriptions that match no keyword
    #[serde(default = "default_fallback")]
    fallback_category: String,

    /// Categories whose weekend spending is flagged
    #[serde(default = "default_discretionary")]
    discretionary_categories: Vec<String>,

    #[serde(default)]
    policy: Policy,

    /// Monthly budget names that feed each daily limit
    #[serde(default = "default_budget_mapping")]
    budget_mapping: Vec<CategoryRule>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            transactions_csv: PathBuf::from(TRANSACTIONS_CSV),
            report_copies: REPORT_COPIES,
            categories_csv: None,
            budget_limits: default_limits(),
            categories: default_categories(),
            fallback_category: default_fallback(),
            discretionary_categories: default_discretionary(),
            policy: Policy::default(),
            budget_mapping: default_budget_mapping(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, if `app_name` is wrong or if
    /// `report_copies` is zero
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.report_copies >= 1,
            "Invalid report_copies in config file: at least 1 report must be kept"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Builds and validates the immutable `Rules`.
    fn rules(&self) -> Result<Rules> {
        Rules::new(
            self.budget_limits.clone(),
            &self.categories,
            &self.fallback_category,
            self.discretionary_categories.clone(),
            self.policy.clone(),
        )
    }
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}
