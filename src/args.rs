//! These structs provide the CLI interface for the daily-spend CLI.

use crate::utils::{parse_date, yesterday};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// daily-spend: A command-line tool for checking a day of spending against a daily budget.
///
/// The purpose of this program is to read your financial transactions from a CSV export of your
/// Tiller Transactions sheet (see https://tiller.com), compare each category's spending with its
/// daily limit, and produce a report with a spending score along with prompts that you can give to
/// an AI assistant for deeper analysis.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and a default configuration file.
    ///
    /// This is the first command you should run. Afterwards edit config.json in the data directory
    /// to set your daily limits and category keywords.
    Init(InitArgs),
    /// Analyze one day of transactions, then save the report and the AI prompts.
    Report(ReportArgs),
    /// Analyze spending over several days.
    Trends(TrendsArgs),
    /// Show which category a transaction description would be assigned.
    Classify(ClassifyArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration and reports are held. Defaults to ~/daily-spend
    #[arg(long, global = true, env = "DAILY_SPEND_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `daily-spend init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where you will save the CSV export of your Transactions sheet. Relative paths are relative
    /// to the data directory. Defaults to transactions.csv in the data directory.
    #[arg(long)]
    transactions_csv: Option<PathBuf>,

    /// Where you will save the CSV export of your Categories sheet. When given, daily limits are
    /// derived from the monthly budgets in that sheet. Relative paths are relative to the data
    /// directory.
    #[arg(long)]
    categories_csv: Option<PathBuf>,
}

impl InitArgs {
    pub fn new(transactions_csv: Option<PathBuf>, categories_csv: Option<PathBuf>) -> Self {
        Self {
            transactions_csv,
            categories_csv,
        }
    }

    pub fn transactions_csv(&self) -> Option<&Path> {
        self.transactions_csv.as_deref()
    }

    pub fn categories_csv(&self) -> Option<&Path> {
        self.categories_csv.as_deref()
    }
}

/// (Not shown): Args for the `daily-spend report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// The day to analyze, as YYYY-MM-DD. Defaults to yesterday.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

impl ReportArgs {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self { date }
    }

    /// The requested date, or yesterday.
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(yesterday)
    }
}

/// (Not shown): Args for the `daily-spend trends` command.
#[derive(Debug, Parser, Clone)]
pub struct TrendsArgs {
    /// The last day of the window, as YYYY-MM-DD. Defaults to yesterday.
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// The number of days in the window.
    #[arg(long, default_value_t = crate::trends::DEFAULT_DAYS)]
    days: u32,
}

impl TrendsArgs {
    pub fn new(end: Option<NaiveDate>, days: u32) -> Self {
        Self { end, days }
    }

    pub fn end(&self) -> NaiveDate {
        self.end.unwrap_or_else(yesterday)
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

/// (Not shown): Args for the `daily-spend classify` command.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    /// A transaction description, e.g. "STARBUCKS #1234"
    description: String,
}

impl ClassifyArgs {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("daily-spend"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or DAILY_SPEND_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("daily-spend")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
