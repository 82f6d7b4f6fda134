//! Zero-profit days for calendar dates the daily table skipped.

use crate::domain::error::ReportError;
use crate::domain::money::checked_sum;
use crate::domain::normalize::DailyRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Fill every missing date from the first record through `end_date`.
///
/// Existing records are kept as they are, including any dated after
/// `end_date`. The result is date-sorted with one record per date.
pub fn fill_gaps(
    records: &[DailyRecord],
    end_date: NaiveDate,
) -> Result<Vec<DailyRecord>, ReportError> {
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        let sum = by_date.entry(record.date).or_default();
        *sum = checked_sum("daily profit", *sum, record.profit)?;
    }

    if let Some(&first) = by_date.keys().next() {
        for date in first.iter_days().take_while(|d| *d <= end_date) {
            by_date.entry(date).or_insert(Decimal::ZERO);
        }
    }

    Ok(by_date
        .into_iter()
        .map(|(date, profit)| DailyRecord::new(date, profit))
        .collect())
}
