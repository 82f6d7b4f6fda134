//! Analysis settings resolved from a [`ConfigPort`].

use crate::domain::error::ReportError;
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, Weekday};
use std::fmt;
use std::path::PathBuf;

/// Header names as they appear in the source report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub date: String,
    pub profit: String,
    pub win_rate: String,
    pub cumulative: String,
    pub deals: String,
    pub trade_time: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Period".into(),
            profit: "Net Profit".into(),
            win_rate: "% Profitable".into(),
            cumulative: "Cumulative Profit".into(),
            deals: "Shares/Ctrts - Profit/Loss".into(),
            trade_time: "Date/Time".into(),
        }
    }
}

/// Last calendar day the gap filler extends the daily table to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndDatePolicy {
    /// The caller-supplied current date.
    #[default]
    Today,
    /// The latest date already present in the daily table.
    LastObserved,
}

impl EndDatePolicy {
    pub fn resolve(self, last_observed: NaiveDate, today: NaiveDate) -> NaiveDate {
        match self {
            EndDatePolicy::Today => today,
            EndDatePolicy::LastObserved => last_observed,
        }
    }
}

impl std::str::FromStr for EndDatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "last" | "last_observed" => Ok(Self::LastObserved),
            other => Err(format!("unknown end date policy {other:?} (expected today or last)")),
        }
    }
}

impl fmt::Display for EndDatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndDatePolicy::Today => write!(f, "today"),
            EndDatePolicy::LastObserved => write!(f, "last"),
        }
    }
}

/// Parse a weekday given by name (`saturday`, `sat`) or by zero-based
/// Monday index (`5` is Saturday).
pub fn parse_weekday(value: &str) -> Result<Weekday, String> {
    let value = value.trim();
    if let Ok(index) = value.parse::<u8>() {
        return Weekday::try_from(index)
            .map_err(|_| format!("weekday index {index} out of range 0..6"));
    }
    value
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday {value:?}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub columns: ColumnNames,
    pub end_date: EndDatePolicy,
    pub week_boundary: Weekday,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            end_date: EndDatePolicy::default(),
            week_boundary: Weekday::Sat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub suffix: String,
}

impl OutputConfig {
    /// `<stem><suffix>.csv`, where the stem is the text before the first dot.
    pub fn file_name_for(&self, source_name: &str) -> String {
        let stem = source_name.split('.').next().unwrap_or(source_name);
        format!("{stem}{}.csv", self.suffix)
    }
}

/// `~/Downloads`, or the working directory when no home is known.
pub fn default_output_directory() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn column(config: &dyn ConfigPort, key: &str, default: String) -> String {
    config
        .get_string("columns", key)
        .map(|s| s.trim().to_string())
        .unwrap_or(default)
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, ReportError> {
    let defaults = ColumnNames::default();
    let columns = ColumnNames {
        date: column(config, "date", defaults.date),
        profit: column(config, "profit", defaults.profit),
        win_rate: column(config, "win_rate", defaults.win_rate),
        cumulative: column(config, "cumulative", defaults.cumulative),
        deals: column(config, "deals", defaults.deals),
        trade_time: column(config, "trade_time", defaults.trade_time),
    };

    let end_date = match config.get_string("analysis", "end_date") {
        Some(s) => s.parse().map_err(|reason| ReportError::ConfigInvalid {
            section: "analysis".into(),
            key: "end_date".into(),
            reason,
        })?,
        None => EndDatePolicy::default(),
    };

    let week_boundary = match config.get_string("analysis", "week_boundary") {
        Some(s) => parse_weekday(&s).map_err(|reason| ReportError::ConfigInvalid {
            section: "analysis".into(),
            key: "week_boundary".into(),
            reason,
        })?,
        None => Weekday::Sat,
    };

    Ok(AnalysisConfig {
        columns,
        end_date,
        week_boundary,
    })
}

pub fn build_output_config(config: &dyn ConfigPort) -> OutputConfig {
    OutputConfig {
        directory: config
            .get_string("output", "directory")
            .map(|d| expand_home(d.trim()))
            .unwrap_or_else(default_output_directory),
        suffix: config
            .get_string("output", "suffix")
            .unwrap_or_else(|| "_weekly".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_when_config_empty() {
        let adapter = FileConfigAdapter::from_string("").unwrap();
        let config = build_analysis_config(&adapter).unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.columns.profit, "Net Profit");
        assert_eq!(config.week_boundary, Weekday::Sat);
    }

    #[test]
    fn reads_overrides() {
        let ini = "[columns]\nprofit = Profit\n\n[analysis]\nend_date = last\nweek_boundary = 6\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = build_analysis_config(&adapter).unwrap();
        assert_eq!(config.columns.profit, "Profit");
        assert_eq!(config.columns.date, "Period");
        assert_eq!(config.end_date, EndDatePolicy::LastObserved);
        assert_eq!(config.week_boundary, Weekday::Sun);
    }

    #[test]
    fn bad_policy_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nend_date = never\n").unwrap();
        let err = build_analysis_config(&adapter).unwrap_err();
        assert!(matches!(err, ReportError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn weekday_by_name_or_index() {
        assert_eq!(parse_weekday("5").unwrap(), Weekday::Sat);
        assert_eq!(parse_weekday("0").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Sunday").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("sat").unwrap(), Weekday::Sat);
        assert!(parse_weekday("7").is_err());
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn end_date_policy_resolution() {
        let last = NaiveDate::from_ymd_opt(2023, 6, 3).unwrap();
        let today = NaiveDate::from_ymd_opt(2023, 6, 10).unwrap();
        assert_eq!(EndDatePolicy::Today.resolve(last, today), today);
        assert_eq!(EndDatePolicy::LastObserved.resolve(last, today), last);
    }

    #[test]
    fn output_file_name_uses_first_stem() {
        let output = OutputConfig {
            directory: PathBuf::from("/tmp"),
            suffix: "_weekly".into(),
        };
        assert_eq!(output.file_name_for("ES.report.csv"), "ES_weekly.csv");
        assert_eq!(output.file_name_for("plain"), "plain_weekly.csv");
    }

    #[test]
    fn output_config_reads_directory() {
        let adapter =
            FileConfigAdapter::from_string("[output]\ndirectory = /srv/out\nsuffix = _daily\n")
                .unwrap();
        let output = build_output_config(&adapter);
        assert_eq!(output.directory, PathBuf::from("/srv/out"));
        assert_eq!(output.suffix, "_daily");
    }
}
