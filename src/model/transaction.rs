use crate::model::Amount;
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::{trace, warn};

/// The rows of a Transactions sheet that could be read, plus a warning for each row that could not.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transactions {
    data: Vec<Transaction>,
    warnings: Vec<RowWarning>,
}

impl Transactions {
    /// Parses the downloaded (or exported) rows of a Transactions sheet. The first row must be the
    /// header row and must contain `Date`, `Description` and `Amount`; other columns are located by
    /// header name when present and ignored otherwise.
    ///
    /// A row with an unreadable date or amount is skipped and recorded as a `RowWarning`. Only a
    /// bad header row is an error.
    pub fn parse<S, R, I>(sheet_data: I) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = sheet_data.into_iter();
        let columns = match rows.next() {
            Some(header_row) => Columns::new(header_row)?,
            None => bail!("An empty data set cannot be parsed into a Transactions object"),
        };

        let mut data = Vec::new();
        let mut warnings = Vec::new();

        for (ix, row) in rows.enumerate() {
            // Sheet rows are 1-based and the header occupies row 1.
            let row_number = ix + 2;
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                trace!("Skipping blank row {row_number}");
                continue;
            }
            match columns.transaction(row_number, &values) {
                Ok(transaction) => data.push(transaction),
                Err(warning) => {
                    warn!("Skipping {warning}");
                    warnings.push(warning);
                }
            }
        }

        Ok(Self { data, warnings })
    }

    pub fn new(data: Vec<Transaction>, warnings: Vec<RowWarning>) -> Self {
        Self { data, warnings }
    }

    pub fn data(&self) -> &[Transaction] {
        &self.data
    }

    pub fn warnings(&self) -> &[RowWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The transactions dated `date`. Warnings are kept when they belong to that date or when the
    /// date of the row could not be read at all.
    pub fn on(&self, date: NaiveDate) -> Transactions {
        self.between(date, date)
    }

    /// The transactions dated from `start` through `end`, inclusive.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Transactions {
        let in_range = |d: NaiveDate| d >= start && d <= end;
        Transactions {
            data: self
                .data
                .iter()
                .filter(|t| in_range(t.date))
                .cloned()
                .collect(),
            warnings: self
                .warnings
                .iter()
                .filter(|w| w.date.is_none_or(in_range))
                .cloned()
                .collect(),
        }
    }
}

/// Represents a single row from the Transactions sheet. Identity is positional: `row` is the row
/// number in the sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) row: usize,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) note: Option<String>,
}

impl Transaction {
    pub fn new(
        row: usize,
        date: NaiveDate,
        description: impl Into<String>,
        amount: impl Into<Amount>,
        category: Option<String>,
    ) -> Self {
        Self {
            row,
            date,
            description: description.into(),
            amount: amount.into(),
            category: non_blank(category.as_deref().unwrap_or_default()),
            account: None,
            note: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The category from the sheet, if the cell was not blank.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// A row that was skipped because it could not be read.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RowWarning {
    pub row: usize,
    /// The date of the row, if it could be read.
    pub date: Option<NaiveDate>,
    pub message: String,
}

impl Display for RowWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.message)
    }
}

/// The column indexes of the headers we care about.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
    account: Option<usize>,
    note: Option<usize>,
}

impl Columns {
    fn new<S, R>(header_row: R) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let headers: Vec<String> = header_row
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .collect();
        let required = |name: &str| match position(&headers, &[name]) {
            Some(ix) => Ok(ix),
            None => bail!("The Transactions sheet has no '{name}' column"),
        };
        Ok(Self {
            date: required(DATE_STR)?,
            description: required(DESCRIPTION_STR)?,
            amount: required(AMOUNT_STR)?,
            category: position(&headers, &[CATEGORY_STR]),
            account: position(&headers, &[ACCOUNT_STR]),
            note: position(&headers, NOTE_STRS),
        })
    }

    fn transaction(
        &self,
        row: usize,
        values: &[String],
    ) -> std::result::Result<Transaction, RowWarning> {
        let cell = |ix: usize| values.get(ix).map(|s| s.trim()).unwrap_or_default();
        let optional = |ix: Option<usize>| ix.and_then(|ix| non_blank(cell(ix)));

        let date = parse_date(cell(self.date)).map_err(|message| RowWarning {
            row,
            date: None,
            message,
        })?;
        let amount = Amount::from_str(cell(self.amount)).map_err(|e| RowWarning {
            row,
            date: Some(date),
            message: e.to_string(),
        })?;

        Ok(Transaction {
            row,
            date,
            description: cell(self.description).to_string(),
            amount,
            category: optional(self.category),
            account: optional(self.account),
            note: optional(self.note),
        })
    }
}

/// Reads the date formats that show up in Tiller sheets and their CSV exports.
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    // Drop any time of day, e.g. "10/21/2025 9:15:30 AM"
    let s = s.split_whitespace().next().unwrap_or_default();
    if s.is_empty() {
        return Err(String::from("The date is empty"));
    }
    let format = if s.contains('-') {
        ISO_FORMAT
    } else if s.rsplit('/').next().is_some_and(|year| year.len() == 2) {
        SHORT_YEAR_FORMAT
    } else {
        SLASH_FORMAT
    };
    NaiveDate::parse_from_str(s, format).map_err(|_| format!("Unable to parse '{s}' as a date"))
}

/// The index of the first header matching any of `names`, ignoring ASCII case.
fn position(headers: &[String], names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

const ISO_FORMAT: &str = "%Y-%m-%d";
const SLASH_FORMAT: &str = "%m/%d/%Y";
const SHORT_YEAR_FORMAT: &str = "%m/%d/%y";

const DATE_STR: &str = "Date";
const DESCRIPTION_STR: &str = "Description";
const AMOUNT_STR: &str = "Amount";
const CATEGORY_STR: &str = "Category";
const ACCOUNT_STR: &str = "Account";
const NOTE_STRS: &[&str] = &["Note", "Notes"];
