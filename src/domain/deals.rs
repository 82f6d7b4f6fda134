//! Realized deal flow from the trade log, keyed by calendar date.

use crate::domain::config::ColumnNames;
use crate::domain::error::ReportError;
use crate::domain::money::{checked_sum, parse_currency};
use crate::domain::table::RawTable;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

const TRADE_SECTION: &str = "trade log";

/// Deal cells meaning "not applicable" (entry legs, share counts).
pub const NOT_APPLICABLE: [&str; 2] = ["1", "n/a"];

const TRADE_TIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
];

/// A trade-log deal mapped onto its calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deal {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Calendar date of a trade-log timestamp, with or without a time part.
pub fn parse_trade_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    TRADE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%m/%d/%Y").ok())
}

/// Signed amount of one deal cell; parentheses mean a loss.
pub fn signed_deal(column: &str, text: &str) -> Result<Decimal, ReportError> {
    let trimmed = text.trim();
    let magnitude = parse_currency(column, trimmed)?;
    if trimmed.starts_with('(') && trimmed.ends_with(')') && !magnitude.is_zero() {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

/// Project the trade log onto dated, signed deals.
///
/// Not-applicable and empty deal cells are skipped, as are rows whose
/// timestamp does not parse. Any other deal cell without a numeric value
/// aborts with `NumericParseFailure`.
pub fn collect_deals(trades: &RawTable, columns: &ColumnNames) -> Result<Vec<Deal>, ReportError> {
    let times = trades.require_column(TRADE_SECTION, &columns.trade_time)?;
    let amounts = trades.require_column(TRADE_SECTION, &columns.deals)?;

    let mut deals = Vec::new();
    for (row, text) in amounts.iter().enumerate() {
        let text = text.trim();
        if text.is_empty() || NOT_APPLICABLE.contains(&text) {
            continue;
        }
        let Some(date) = times.get(row).and_then(|t| parse_trade_date(t)) else {
            debug!(row, "trade row without a usable timestamp dropped");
            continue;
        };
        deals.push(Deal {
            date,
            amount: signed_deal(&columns.deals, text)?,
        });
    }
    debug!(deals = deals.len(), "trade log projected");
    Ok(deals)
}

/// Per-day deal sums plus their running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealFlow {
    pub deals: Decimal,
    pub total_deals: Decimal,
}

/// Left-join deals onto `dates` (ascending) and accumulate them.
///
/// Several deals on the same date are summed. Dates with no deal get zero.
/// Deals on dates outside `dates` are not counted.
pub fn merge_deals(dates: &[NaiveDate], deals: &[Deal]) -> Result<Vec<DealFlow>, ReportError> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for deal in deals {
        let sum = by_date.entry(deal.date).or_default();
        *sum = checked_sum("deals", *sum, deal.amount)?;
    }

    let mut total = Decimal::ZERO;
    dates
        .iter()
        .map(|date| -> Result<DealFlow, ReportError> {
            let deals = by_date.get(date).copied().unwrap_or(Decimal::ZERO);
            total = checked_sum("total deals", total, deals)?;
            Ok(DealFlow {
                deals,
                total_deals: total,
            })
        })
        .collect()
}
