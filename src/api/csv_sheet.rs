//! Implements the `Sheet` trait by reading CSV exports of Tiller sheets from disk.

use crate::api::{Sheet, CATEGORIES, TRANSACTIONS};
use crate::Result;
use anyhow::{bail, Context};
use std::path::PathBuf;
use tracing::{trace, warn};

/// Reads CSV files that were exported from the Transactions tab and, optionally, the Categories tab
/// (File > Download > CSV).
pub(crate) struct CsvSheet {
    transactions: PathBuf,
    categories: Option<PathBuf>,
}

impl CsvSheet {
    pub(crate) fn new(transactions: impl Into<PathBuf>, categories: Option<PathBuf>) -> Self {
        Self {
            transactions: transactions.into(),
            categories,
        }
    }
}

#[async_trait::async_trait]
impl Sheet for CsvSheet {
    async fn get(&mut self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        let path = match sheet_name {
            TRANSACTIONS => &self.transactions,
            CATEGORIES => match &self.categories {
                Some(path) => path,
                None => bail!("No CSV export is configured for the {CATEGORIES} sheet"),
            },
            other => bail!("Sheet '{other}' not found"),
        };
        trace!("get for {sheet_name} from {}", path.display());
        let content = tokio::fs::read(path).await.with_context(|| {
            format!(
                "Unable to read the {sheet_name} export at {}",
                path.display()
            )
        })?;
        read_rows(&content)
    }
}

/// Parses CSV data into rows. Every line, including the header, is returned as a row. Rows may
/// have different lengths. Bytes that are not valid UTF-8 are replaced, so one badly encoded cell
/// does not cost the rest of the sheet.
pub(super) fn read_rows(csv_data: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_data);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (ix, result) in rdr.byte_records().enumerate() {
        let record = result.with_context(|| format!("Malformed CSV at record {}", ix + 1))?;
        let row: Vec<String> = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        if std::str::from_utf8(record.as_slice()).is_err() {
            warn!("Record {} is not valid UTF-8, unreadable characters were replaced", ix + 1);
        }
        rows.push(row);
    }
    Ok(rows)
}
