//! Configuration validation.
//!
//! Validates every config field before any report is processed.

use crate::domain::config::{build_analysis_config, ColumnNames};
use crate::domain::error::ReportError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ReportError> {
    let analysis = build_analysis_config(config)?;
    validate_daily_columns(&analysis.columns)?;
    validate_trade_columns(&analysis.columns)?;
    validate_suffix(config)?;
    Ok(())
}

fn validate_daily_columns(columns: &ColumnNames) -> Result<(), ReportError> {
    let ColumnNames {
        date,
        profit,
        win_rate,
        ..
    } = columns;

    if date == profit || date == win_rate || profit == win_rate {
        return Err(ReportError::ConfigInvalid {
            section: "columns".to_string(),
            key: "date".to_string(),
            reason: "date, profit and win_rate must name different columns".to_string(),
        });
    }
    Ok(())
}

fn validate_trade_columns(columns: &ColumnNames) -> Result<(), ReportError> {
    if columns.deals == columns.trade_time {
        return Err(ReportError::ConfigInvalid {
            section: "columns".to_string(),
            key: "deals".to_string(),
            reason: "deals and trade_time must name different columns".to_string(),
        });
    }
    Ok(())
}

fn validate_suffix(config: &dyn ConfigPort) -> Result<(), ReportError> {
    match config.get_string("output", "suffix") {
        Some(s) if s.contains(['/', '\\']) => Err(ReportError::ConfigInvalid {
            section: "output".to_string(),
            key: "suffix".to_string(),
            reason: "suffix must not contain path separators".to_string(),
        }),
        _ => Ok(()),
    }
}
