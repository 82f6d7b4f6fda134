#![allow(dead_code)]

use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tsweekly::adapters::csv_adapter::CsvReportReader;
use tsweekly::domain::analysis::AnalysisResult;
use tsweekly::domain::error::ReportError;
pub use tsweekly::domain::report_row::ReportRow;
use tsweekly::ports::report_port::ReportSource;
use tsweekly::ports::result_port::ResultSink;

/// Builds report exports in the layout of the platform's CSV files.
pub struct ReportBuilder {
    symbol: Option<String>,
    strategies: Vec<String>,
    daily: Vec<[String; 4]>,
    trades: Vec<[String; 3]>,
    with_trade_log: bool,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            symbol: Some("@ES".into()),
            strategies: vec!["Breakout LE".into(), "Momentum Swing (On)".into()],
            daily: Vec::new(),
            trades: Vec::new(),
            with_trade_log: true,
        }
    }

    pub fn symbol(mut self, symbol: Option<&str>) -> Self {
        self.symbol = symbol.map(str::to_string);
        self
    }

    pub fn strategies(mut self, strategies: &[&str]) -> Self {
        self.strategies = strategies.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Daily row: period, net profit, % profitable. Cumulative is filler.
    pub fn daily(mut self, period: &str, profit: &str, win_rate: &str) -> Self {
        self.daily.push([
            period.into(),
            profit.into(),
            win_rate.into(),
            "$0".into(),
        ]);
        self
    }

    /// Trade row: trade number, date/time, profit/loss cell.
    pub fn trade(mut self, number: &str, date_time: &str, deals: &str) -> Self {
        self.trades
            .push([number.into(), date_time.into(), deals.into()]);
        self
    }

    pub fn without_trade_log(mut self) -> Self {
        self.with_trade_log = false;
        self
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let r = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();

        rows.push(r(&["TradeStation Strategy Performance Report - Momentum Swing"]));
        rows.push(r(&["", "", ""]));
        if let Some(symbol) = &self.symbol {
            rows.push(r(&["Symbol", "", symbol.as_str(), ""]));
        }
        rows.push(r(&["Symbol Data", "", ""]));
        rows.push(r(&["", "", ""]));

        rows.push(r(&["TradeStation Strategies Applied"]));
        for strategy in &self.strategies {
            rows.push(r(&[strategy.as_str(), "", ""]));
        }
        rows.push(r(&["TradeStation Strategy Inputs"]));
        rows.push(r(&["Length (On)", "20"]));
        rows.push(r(&["", "", ""]));

        rows.push(r(&["TradeStation Periodical Returns: Daily"]));
        rows.push(r(&["Mark-To-Market Period Analysis:"]));
        rows.push(r(&["Period", "Net Profit", "% Profitable", "Cumulative Profit", ""]));
        for d in &self.daily {
            rows.push(r(&[d[0].as_str(), d[1].as_str(), d[2].as_str(), d[3].as_str(), ""]));
        }
        rows.push(r(&["", "", "", "", ""]));
        rows.push(r(&["Mark-To-Market Rolling Period Analysis:"]));
        rows.push(r(&["Period", "Net Profit", "% Profitable"]));
        rows.push(r(&["06/30/2023", "$12,345", "100.00%"]));
        rows.push(r(&["", "", ""]));

        if self.with_trade_log {
            rows.push(r(&["TradeStation Trades List"]));
            rows.push(r(&[
                "#",
                "Type",
                "Date/Time",
                "Signal",
                "Price",
                "Shares/Ctrts - Profit/Loss",
            ]));
            for t in &self.trades {
                rows.push(r(&[t[0].as_str(), "Sell", t[1].as_str(), "Exit", "4,200.25", t[2].as_str()]));
            }
            rows.push(r(&["", "", "", "", "", ""]));
            rows.push(r(&["Trades List"]));
            rows.push(r(&["Period", "Net Profit"]));
        }

        rows.into_iter().map(ReportRow::new).collect()
    }

    /// The report as CSV text, quoting every cell.
    pub fn csv_text(&self) -> String {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(Vec::new());
        for row in self.rows() {
            wtr.write_record(row.cells()).unwrap();
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.csv_text()).unwrap();
        path
    }
}

/// Scenario A/B report used across tests.
pub fn sample_report() -> ReportBuilder {
    ReportBuilder::new()
        .daily("06/03/2023", "$1", "50.00%")
        .daily("06/01/2023", "$100", "100.00%")
        .trade("1", "06/01/2023 15:45", "(50.00)")
        .trade("1", "06/01/2023 09:30", "1")
        .trade("2", "06/02/2023 14:00", "n/a")
}

pub struct MockReportSource {
    pub reports: HashMap<PathBuf, Vec<ReportRow>>,
}

impl MockReportSource {
    pub fn new() -> Self {
        Self {
            reports: HashMap::new(),
        }
    }

    pub fn with_report(mut self, path: &str, rows: Vec<ReportRow>) -> Self {
        self.reports.insert(PathBuf::from(path), rows);
        self
    }
}

impl ReportSource for MockReportSource {
    fn read_rows(&self, path: &Path) -> Result<Vec<ReportRow>, ReportError> {
        self.reports.get(path).cloned().ok_or_else(|| {
            ReportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }
}

pub struct MemorySink {
    pub stored: RefCell<Vec<(String, AnalysisResult)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(Vec::new()),
        }
    }
}

impl ResultSink for MemorySink {
    fn store(&self, result: &AnalysisResult, source_name: &str) -> Result<PathBuf, ReportError> {
        self.stored
            .borrow_mut()
            .push((source_name.to_string(), result.clone()));
        Ok(PathBuf::from(format!("memory://{source_name}")))
    }
}

pub fn parse_csv_rows(text: &str) -> Vec<ReportRow> {
    CsvReportReader::parse_rows(text.as_bytes()).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
