use crate::api::{self, Mode};
use crate::commands::Out;
use crate::prompt::Prompts;
use crate::report::{analyze, Report};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The structured output of the `report` command.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub report: Report,
    pub prompts: Prompts,
    pub report_path: PathBuf,
    pub prompt_path: PathBuf,
}

/// Reads the Transactions sheet, analyzes `date` and saves the report and AI prompts to the
/// reports directory. When a Categories export is configured, its monthly budgets for the month of
/// `date` set the daily limits.
pub async fn report(config: Config, mode: Mode, date: NaiveDate) -> Result<Out<ReportOutput>> {
    let mut sheet = api::sheet(&config, mode);
    let transactions = api::fetch_transactions(sheet.as_mut()).await?;
    let rules = api::fetch_rules(sheet.as_mut(), &config, date).await?;

    let report = analyze(date, &transactions, &rules)?;
    for warning in &report.warnings {
        warn!("Skipped {warning}");
    }
    let prompts = Prompts::new(&report, &transactions, &rules);

    let archive = config.archive();
    let report_path = archive.save_report(&report).await?;
    let prompt_path = archive.save_prompts(date, &prompts).await?;
    debug!(
        "Saved {} and {}",
        report_path.display(),
        prompt_path.display()
    );

    let message = format!(
        "{}Report saved to {}\nAI prompts saved to {}",
        report.summary_text(),
        report_path.display(),
        prompt_path.display()
    );
    Ok(Out::new(
        message,
        ReportOutput {
            report,
            prompts,
            report_path,
            prompt_path,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskLevel, Severity};
    use crate::test::{seed_date, TestEnv};
    use crate::utils;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_report_seed_day() {
        let env = TestEnv::new().await;
        let out = report(env.config(), Mode::Testing, seed_date())
            .await
            .unwrap();
        let output = out.structure().unwrap();
        let report = &output.report;

        // Food & Dining: 5.50 + 85.00 = 90.50 of 50 is Critical.
        // Shopping: 45.99 of 40 is Medium. Groceries has no limit.
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.alerts[0].category, "Food & Dining");
        assert_eq!(report.alerts[0].severity, Severity::Critical);
        assert_eq!(report.alerts[1].category, "Shopping");
        assert_eq!(report.alerts[1].severity, Severity::Medium);
        assert_eq!(report.score, 70);
        assert_eq!(report.risk, RiskLevel::LowRisk);

        assert_eq!(report.summary.total_spent, dec!(171.99));
        assert_eq!(report.summary.income, dec!(2150));
        assert_eq!(report.warnings.len(), 1);

        assert!(output.report_path.is_file());
        assert!(output.prompt_path.is_file());
        let saved: Report = utils::deserialize(&output.report_path).await.unwrap();
        assert_eq!(&saved, report);

        assert!(out.message().contains("[Critical] Food & Dining"));
        assert!(out.message().contains("Report saved to"));
    }

    #[tokio::test]
    async fn test_report_with_monthly_budgets() {
        let env = TestEnv::with_monthly_budgets().await;
        let out = report(env.config(), Mode::Testing, seed_date())
            .await
            .unwrap();
        let report = &out.structure().unwrap().report;

        // Daily limits: Food & Dining 1050 / 30 = 35, Shopping 300 / 30 = 10 and
        // Transportation 120 / 30 = 4. All three are at least 1.5 times over.
        assert_eq!(report.alerts.len(), 3);
        assert!(report
            .alerts
            .iter()
            .all(|alert| alert.severity == Severity::Critical));
        assert_eq!(report.score, 25);
        assert_eq!(report.risk, RiskLevel::HighRisk);
    }

    #[tokio::test]
    async fn test_report_missing_categories_csv() {
        let env = TestEnv::with_monthly_budgets().await;
        let config = env.config();
        utils::write(
            config.transactions_csv(),
            "Date,Description,Amount\n2025-01-29,Lunch,-$6.00\n",
        )
        .await
        .unwrap();
        assert!(report(config, Mode::Csv, seed_date()).await.is_err());
    }

    #[tokio::test]
    async fn test_report_huge_expense() {
        let env = TestEnv::new().await;
        let config = env.config();
        utils::write(
            config.transactions_csv(),
            "Date,Description,Amount\n\
             2025-01-29,Restaurant,\"-$79,228,162,514,264,337,593,543,950,335\"\n\
             2025-01-29,Restaurant,\"-$79,228,162,514,264,337,593,543,950,335\"\n",
        )
        .await
        .unwrap();
        let out = report(config, Mode::Csv, seed_date()).await.unwrap();
        let report = &out.structure().unwrap().report;
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].severity, Severity::Critical);
        assert_eq!(report.summary.total_spent, Decimal::MAX);
    }

    #[tokio::test]
    async fn test_report_missing_csv() {
        let env = TestEnv::new().await;
        assert!(report(env.config(), Mode::Csv, seed_date()).await.is_err());
    }

    #[tokio::test]
    async fn test_report_from_csv() {
        let env = TestEnv::new().await;
        let config = env.config();
        utils::write(
            config.transactions_csv(),
            "Date,Description,Amount\n2025-01-29,Lunch at the restaurant,-$60.00\n",
        )
        .await
        .unwrap();
        let out = report(config, Mode::Csv, seed_date()).await.unwrap();
        let report = &out.structure().unwrap().report;
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].severity, Severity::High);
        assert_eq!(report.score, 85);
        assert_eq!(report.risk, RiskLevel::LowRisk);
    }
}
