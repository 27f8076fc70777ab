//! Saving reports and prompts to the reports directory.

use crate::prompt::Prompts;
use crate::report::Report;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for saved report files.
pub const REPORT: &str = "report";

/// Prefix for saved prompt files.
pub const PROMPT: &str = "prompt";

const JSON: &str = "json";
const TXT: &str = "txt";

/// Writes report and prompt files and rotates old ones.
///
/// The `Archive` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::archive()` or `Archive::new()`.
#[derive(Debug, Clone)]
pub struct Archive {
    reports_dir: PathBuf,
    copies: u32,
}

impl Archive {
    pub fn new(config: &Config) -> Self {
        Self {
            reports_dir: config.reports().to_path_buf(),
            copies: config.report_copies(),
        }
    }

    /// Saves the report as pretty-printed JSON named `report.YYYY-MM-DD-NNN.json`, where the date
    /// is the date of the report and NNN is a sequence number. Returns the path of the new file.
    pub async fn save_report(&self, report: &Report) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        self.save(REPORT, report.date, JSON, json).await
    }

    /// Saves the prompts as text named `prompt.YYYY-MM-DD-NNN.txt`.
    pub async fn save_prompts(&self, date: NaiveDate, prompts: &Prompts) -> Result<PathBuf> {
        self.save(PROMPT, date, TXT, prompts.to_text()).await
    }

    async fn save(
        &self,
        prefix: &str,
        date: NaiveDate,
        extension: &str,
        contents: String,
    ) -> Result<PathBuf> {
        let date = date.format("%Y-%m-%d").to_string();
        let seq = self.next_sequence_number(prefix, &date, extension).await?;
        let path = self
            .reports_dir
            .join(format!("{prefix}.{date}-{seq:03}.{extension}"));
        utils::write(&path, contents).await?;
        debug!("Wrote {}", path.display());

        self.rotate(prefix, extension, &path).await?;
        Ok(path)
    }

    /// Scans the reports directory for files with the given prefix and date and returns the next
    /// sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str, extension: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;
        for name in self.file_names().await? {
            if let Some(seq) = parse_sequence_number(&name, prefix, date, extension) {
                max_seq = max_seq.max(seq);
            }
        }
        Ok(max_seq + 1)
    }

    /// Keeps only the newest `copies` files with the given prefix, ordered by date and then by
    /// sequence number. The file at `keep` was just written and is never removed, even when its
    /// date is older than everything else in the directory.
    async fn rotate(&self, prefix: &str, extension: &str, keep: &Path) -> Result<()> {
        let mut files: Vec<(String, u32, String)> = self
            .file_names()
            .await?
            .into_iter()
            .filter_map(|name| {
                let (date, seq) = parse_archive_name(&name, prefix, extension)?;
                let date = date.to_string();
                Some((date, seq, name))
            })
            .collect();
        files.sort();

        let copies = self.copies.max(1) as usize;
        let mut to_delete = files.len().saturating_sub(copies);
        for (_, _, name) in files {
            if to_delete == 0 {
                break;
            }
            let path = self.reports_dir.join(&name);
            if path == keep {
                continue;
            }
            debug!("Removing old file {}", path.display());
            utils::remove(&path).await?;
            to_delete -= 1;
        }
        Ok(())
    }

    async fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.reports_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

/// Parses the sequence number from `{prefix}.{date}-{NNN}.{extension}`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str, extension: &str) -> Option<u32> {
    match parse_archive_name(filename, prefix, extension) {
        Some((d, seq)) if d == date => Some(seq),
        _ => None,
    }
}

/// Splits `{prefix}.{YYYY-MM-DD}-{NNN}.{extension}` into the date and the sequence number.
fn parse_archive_name<'a>(
    filename: &'a str,
    prefix: &str,
    extension: &str,
) -> Option<(&'a str, u32)> {
    let stem = filename
        .strip_prefix(prefix)?
        .strip_prefix('.')?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    let (date, seq) = stem.rsplit_once('-')?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((date, seq.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transactions;
    use crate::report::analyze;
    use crate::rules::Rules;
    use crate::test::TestEnv;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("report.2025-01-29-001.json", REPORT, "2025-01-29", JSON),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("prompt.2025-01-29-042.txt", PROMPT, "2025-01-29", TXT),
            Some(42)
        );
        // Wrong prefix
        assert_eq!(
            parse_sequence_number("prompt.2025-01-29-001.txt", REPORT, "2025-01-29", TXT),
            None
        );
        // Wrong date
        assert_eq!(
            parse_sequence_number("report.2025-01-28-001.json", REPORT, "2025-01-29", JSON),
            None
        );
    }

    #[test]
    fn test_parse_archive_name() {
        assert_eq!(
            parse_archive_name("report.2025-01-29-001.json", REPORT, JSON),
            Some(("2025-01-29", 1))
        );
        assert_eq!(
            parse_archive_name("report.2025-01-29-1000.json", REPORT, JSON),
            Some(("2025-01-29", 1000))
        );
        assert_eq!(parse_archive_name("report.2025-01-29-001.json", PROMPT, JSON), None);
        assert_eq!(parse_archive_name("report.2025-01-29-001.txt", REPORT, JSON), None);
        assert_eq!(parse_archive_name("report.notes-001.json", REPORT, JSON), None);
        assert_eq!(parse_archive_name("reports.2025-01-29-001.json", REPORT, JSON), None);
    }

    #[tokio::test]
    async fn test_save_and_rotate() {
        let env = TestEnv::new().await;
        let config = env.config();
        let archive = config.archive();
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let report = analyze(date, &Transactions::default(), &Rules::default()).unwrap();

        let mut paths = Vec::new();
        for _ in 0..(config.report_copies() + 2) {
            paths.push(archive.save_report(&report).await.unwrap());
        }
        assert!(paths[0].ends_with("report.2025-01-29-001.json"));
        assert!(paths[1].ends_with("report.2025-01-29-002.json"));

        let saved = utils::read(paths.last().unwrap()).await.unwrap();
        let back: Report = serde_json::from_str(&saved).unwrap();
        assert_eq!(back, report);

        let remaining = archive.file_names().await.unwrap();
        assert_eq!(remaining.len(), config.report_copies() as usize);
        assert!(!paths[0].exists());
        assert!(!paths[1].exists());
        assert!(paths.last().unwrap().exists());
    }

    #[tokio::test]
    async fn test_prompts_are_rotated_separately() {
        let env = TestEnv::new().await;
        let archive = env.config().archive();
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let rules = Rules::default();
        let report = analyze(date, &Transactions::default(), &rules).unwrap();
        let prompts = Prompts::new(&report, &Transactions::default(), &rules);

        let report_path = archive.save_report(&report).await.unwrap();
        let prompt_path = archive.save_prompts(date, &prompts).await.unwrap();
        assert!(report_path.ends_with("report.2025-01-29-001.json"));
        assert!(prompt_path.ends_with("prompt.2025-01-29-001.txt"));
        let text = utils::read(&prompt_path).await.unwrap();
        assert!(text.contains("=== ANALYSIS PROMPT ==="));
    }

    #[tokio::test]
    async fn test_past_dated_report_survives_full_archive() {
        let env = TestEnv::new().await;
        let config = env.config();
        let archive = config.archive();
        let rules = Rules::default();
        let recent = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let recent_report = analyze(recent, &Transactions::default(), &rules).unwrap();
        let mut recent_paths = Vec::new();
        for _ in 0..config.report_copies() {
            recent_paths.push(archive.save_report(&recent_report).await.unwrap());
        }

        let past = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let past_report = analyze(past, &Transactions::default(), &rules).unwrap();
        let path = archive.save_report(&past_report).await.unwrap();

        assert!(path.ends_with("report.2025-01-01-001.json"));
        assert!(path.exists());
        assert!(!recent_paths[0].exists());
        assert!(recent_paths[1].exists());
        let remaining = archive.file_names().await.unwrap();
        assert_eq!(remaining.len(), config.report_copies() as usize);
    }

    #[tokio::test]
    async fn test_sequence_numbers_rotate_numerically() {
        let env = TestEnv::new().await;
        let config = env.config();
        let archive = config.archive();
        let reports = config.reports();
        for seq in 970..1000 {
            utils::write(reports.join(format!("report.2025-01-29-{seq:03}.json")), "{}")
                .await
                .unwrap();
        }
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let report = analyze(date, &Transactions::default(), &Rules::default()).unwrap();
        let path = archive.save_report(&report).await.unwrap();

        assert!(path.ends_with("report.2025-01-29-1000.json"));
        assert!(path.exists());
        assert!(reports.join("report.2025-01-29-999.json").exists());
        assert!(!reports.join("report.2025-01-29-970.json").exists());
    }
}
