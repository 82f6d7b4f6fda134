//! Daily returns normalization: dates, signed profits, one record per day.

use crate::domain::config::ColumnNames;
use crate::domain::error::ReportError;
use crate::domain::money::{checked_sum, parse_currency};
use crate::domain::table::RawTable;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

pub const REPORT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Win-rate text marking a day whose profit is kept positive.
pub const ALL_PROFITABLE: &str = "100.00%";

const DAILY_SECTION: &str = "daily returns";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub profit: Decimal,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, profit: Decimal) -> Self {
        Self { date, profit }
    }
}

/// Parse a report date in the one accepted format.
pub fn parse_report_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).map_err(|_| {
        ReportError::DateParseFailure {
            value: value.to_string(),
            format: REPORT_DATE_FORMAT.to_string(),
        }
    })
}

/// Signed profit for one daily row.
///
/// A parsed amount of exactly 1 is a placeholder in this report family and
/// is zeroed before the sign is applied. Any win rate other than
/// "100.00%" marks the amount as a loss.
pub fn signed_profit(amount: Decimal, win_rate: Option<&str>) -> Decimal {
    let amount = if amount == Decimal::ONE {
        Decimal::ZERO
    } else {
        amount
    };
    if amount.is_zero() || win_rate == Some(ALL_PROFITABLE) {
        amount
    } else {
        -amount
    }
}

/// Turn the daily returns table into one signed record per calendar date.
///
/// Rows whose date cell does not parse are dropped. An unparseable profit
/// cell on a dated row aborts with `NumericParseFailure`.
pub fn normalize_daily(
    table: &RawTable,
    columns: &ColumnNames,
) -> Result<Vec<DailyRecord>, ReportError> {
    let dates = table.require_column(DAILY_SECTION, &columns.date)?;
    let profits = table.require_column(DAILY_SECTION, &columns.profit)?;
    let win_rates = table.column(&columns.win_rate).unwrap_or_default();

    let mut records = Vec::with_capacity(table.row_count());
    let mut undated = 0usize;
    for row in 0..table.row_count() {
        let date_text = dates.get(row).map(String::as_str).unwrap_or_default();
        let date = match parse_report_date(date_text) {
            Ok(date) => date,
            Err(err) => {
                undated += 1;
                debug!(row, %err, "daily row without a usable date dropped");
                continue;
            }
        };

        let profit_text = profits.get(row).map(String::as_str).unwrap_or_default();
        let amount = parse_currency(&columns.profit, profit_text)?;
        let profit = signed_profit(amount, win_rates.get(row).map(String::as_str));
        records.push(DailyRecord::new(date, profit));
    }
    debug!(rows = records.len(), undated, "daily returns normalized");

    group_by_date(records)
}

/// Sum profits per date, returning records in ascending date order.
pub fn group_by_date<I>(records: I) -> Result<Vec<DailyRecord>, ReportError>
where
    I: IntoIterator<Item = DailyRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        let sum = by_date.entry(record.date).or_default();
        *sum = checked_sum("daily profit", *sum, record.profit)?;
    }
    Ok(by_date
        .into_iter()
        .map(|(date, profit)| DailyRecord::new(date, profit))
        .collect())
}
