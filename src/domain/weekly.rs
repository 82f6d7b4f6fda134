//! Weekly profit rollups on a configured boundary weekday.

use crate::domain::error::ReportError;
use crate::domain::money::checked_sum;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use std::collections::VecDeque;

pub const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyFlow {
    pub weekly_profit: Decimal,
    pub total_weekly_profit: Decimal,
}

/// Weekly profit for each `(date, net profit)` pair, in ascending order.
///
/// On a boundary day the weekly profit is the sum of net profit over the
/// seven calendar days ending on that day (fewer at the start of the
/// table); every other day carries zero. The running total accumulates
/// the weekly values.
pub fn weekly_profits(
    days: &[(NaiveDate, Decimal)],
    boundary: Weekday,
) -> Result<Vec<WeeklyFlow>, ReportError> {
    let mut window: VecDeque<(NaiveDate, Decimal)> = VecDeque::with_capacity(WEEK_DAYS as usize);
    let mut window_sum = Decimal::ZERO;
    let mut total = Decimal::ZERO;
    let mut flows = Vec::with_capacity(days.len());

    for &(date, profit) in days {
        window.push_back((date, profit));
        window_sum = checked_sum("weekly profit", window_sum, profit)?;
        while let Some(&(oldest, amount)) = window.front() {
            if (date - oldest).num_days() < WEEK_DAYS {
                break;
            }
            window_sum = checked_sum("weekly profit", window_sum, -amount)?;
            window.pop_front();
        }

        let weekly_profit = if date.weekday() == boundary {
            window_sum
        } else {
            Decimal::ZERO
        };
        total = checked_sum("total weekly profit", total, weekly_profit)?;
        flows.push(WeeklyFlow {
            weekly_profit,
            total_weekly_profit: total,
        });
    }
    Ok(flows)
}
