//! Report-to-daily-table pipeline and its result type.

use crate::domain::config::AnalysisConfig;
use crate::domain::deals::{collect_deals, merge_deals};
use crate::domain::error::ReportError;
use crate::domain::gap_fill::fill_gaps;
use crate::domain::money::checked_sum;
use crate::domain::normalize::normalize_daily;
use crate::domain::report_row::ReportRow;
use crate::domain::section::extract_sections;
use crate::domain::table::RawTable;
use crate::domain::weekly::weekly_profits;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

pub const COLUMNS: [&str; 9] = [
    "Strategy",
    "Symbol",
    "Period",
    "Net Profit",
    "Total Profit",
    "Deals",
    "Total Deals",
    "Weekly Profit",
    "Total Weekly Profit",
];

pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Decimal places of every amount in the output table.
pub const OUTPUT_SCALE: u32 = 2;

/// An amount rounded and padded to [`OUTPUT_SCALE`] places.
pub fn amount_text(value: Decimal) -> String {
    let mut value = value.round_dp(OUTPUT_SCALE);
    value.rescale(OUTPUT_SCALE);
    value.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRow {
    pub date: NaiveDate,
    pub net_profit: Decimal,
    pub total_profit: Decimal,
    pub deals: Decimal,
    pub total_deals: Decimal,
    pub weekly_profit: Decimal,
    pub total_weekly_profit: Decimal,
}

/// One row per calendar date, ascending and contiguous from the first
/// observed date. Strategy and symbol are constant down the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub strategy: String,
    pub symbol: String,
    pub rows: Vec<AnalysisRow>,
}

impl AnalysisResult {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    pub fn final_row(&self) -> Option<&AnalysisRow> {
        self.rows.last()
    }

    /// Cells of one row in [`COLUMNS`] order.
    pub fn record(&self, row: &AnalysisRow) -> [String; 9] {
        [
            self.strategy.clone(),
            self.symbol.clone(),
            row.date.format(OUTPUT_DATE_FORMAT).to_string(),
            amount_text(row.net_profit),
            amount_text(row.total_profit),
            amount_text(row.deals),
            amount_text(row.total_deals),
            amount_text(row.weekly_profit),
            amount_text(row.total_weekly_profit),
        ]
    }
}

/// Run the full analysis over one report's rows.
///
/// `today` is only consulted when the end date policy asks for it.
pub fn analyze<I>(
    rows: I,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Result<AnalysisResult, ReportError>
where
    I: IntoIterator<Item = ReportRow>,
{
    let sections = extract_sections(rows)?;
    let daily_table = RawTable::build("daily returns", &sections.daily_returns)?;
    let trade_table = RawTable::build("trade log", &sections.trade_log)?;

    let records = normalize_daily(&daily_table, &config.columns)?;
    let last_observed = records
        .last()
        .map(|r| r.date)
        .ok_or_else(|| ReportError::MalformedSection {
            section: "daily returns".into(),
            reason: "no dated rows".into(),
        })?;
    let end_date = config.end_date.resolve(last_observed, today);
    let records = fill_gaps(&records, end_date)?;
    debug!(days = records.len(), %end_date, "daily table gap-filled");

    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let deals = collect_deals(&trade_table, &config.columns)?;
    let deal_flow = merge_deals(&dates, &deals)?;

    let days: Vec<(NaiveDate, Decimal)> = records.iter().map(|r| (r.date, r.profit)).collect();
    let weekly = weekly_profits(&days, config.week_boundary)?;

    let mut total_profit = Decimal::ZERO;
    let rows = records
        .iter()
        .zip(deal_flow)
        .zip(weekly)
        .map(|((record, flow), week)| -> Result<AnalysisRow, ReportError> {
            total_profit = checked_sum("total profit", total_profit, record.profit)?;
            Ok(AnalysisRow {
                date: record.date,
                net_profit: record.profit,
                total_profit,
                deals: flow.deals,
                total_deals: flow.total_deals,
                weekly_profit: week.weekly_profit,
                total_weekly_profit: week.total_weekly_profit,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisResult {
        strategy: sections.strategy_name(),
        symbol: sections.symbol,
        rows,
    })
}
