use crate::api::{self, Mode};
use crate::commands::Out;
use crate::model::dollars;
use crate::trends::{self as analysis, Trends};
use crate::vendors::{vendors, VendorAnalysis};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// The structured output of the `trends` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsOutput {
    pub trends: Trends,
    pub vendors: VendorAnalysis,
}

/// Reads the Transactions sheet and analyzes the `days` days ending on `end`: daily totals and
/// their direction, plus the vendors and categories the money went to.
pub async fn trends(
    config: Config,
    mode: Mode,
    end: NaiveDate,
    days: u32,
) -> Result<Out<TrendsOutput>> {
    let mut sheet = api::sheet(&config, mode);
    let transactions = api::fetch_transactions(sheet.as_mut()).await?;
    let trends = analysis::trends(&transactions, end, days)?;
    let vendors = vendors(&transactions, trends.start, trends.end, config.rules());

    let mut message = format!(
        "Spending from {} to {}: {} days with expenses, {} per day on average, trend {}, \
         consistency {:.0}/100",
        trends.start,
        trends.end,
        trends.days.len(),
        dollars(trends.average),
        trends.direction,
        trends.consistency
    );
    if let (Some(highest), Some(lowest)) = (&trends.highest, &trends.lowest) {
        message.push_str(&format!(
            "\nHighest {} on {}, lowest {} on {}",
            dollars(highest.total),
            highest.date,
            dollars(lowest.total),
            lowest.date
        ));
    }
    if !vendors.top.is_empty() {
        let top: Vec<String> = vendors
            .top
            .iter()
            .take(3)
            .map(|v| format!("{} {}", v.name, dollars(v.total)))
            .collect();
        message.push_str(&format!("\nTop vendors: {}", top.join(", ")));
    }
    if !vendors.subscription_candidates.is_empty() {
        message.push_str(&format!(
            "\nPossible subscriptions: {}",
            vendors.subscription_candidates.join(", ")
        ));
    }
    Ok(Out::new(message, TrendsOutput { trends, vendors }))
}
