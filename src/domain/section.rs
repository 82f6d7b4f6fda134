//! Marker-driven section extraction.
//!
//! A report mixes several sections with no delimiters other than literal
//! header cells. [`SectionExtractor`] walks the rows once, keeping its
//! position in an explicit [`ExtractorState`], and buckets rows into the
//! daily returns table and the trade log while picking up the symbol and
//! the active strategy.

use crate::domain::error::ReportError;
use crate::domain::report_row::ReportRow;
use tracing::debug;

pub const TRADES_LIST_END: &str = "Trades List";
pub const TRADES_LIST_START: &str = "TradeStation Trades List";
pub const DAILY_RETURNS: &str = "TradeStation Periodical Returns: Daily";
pub const ROLLING_PERIOD_ANALYSIS: &str = "Mark-To-Market Rolling Period Analysis:";
pub const PERIOD_ANALYSIS: &str = "Mark-To-Market Period Analysis:";
pub const SYMBOL: &str = "Symbol";
pub const STRATEGIES_APPLIED: &str = "TradeStation Strategies Applied";
pub const STRATEGY_INPUTS: &str = "TradeStation Strategy Inputs";
pub const ACTIVE_STRATEGY_TAG: &str = "(On)";

/// Where a row was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTag {
    TradeLog,
    DailyReturns,
    StrategyBlock,
    Unclassified,
}

/// Position of the extractor within the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorState {
    pub in_trade_log: bool,
    pub in_strategy_block: bool,
    pub in_daily_returns_candidate: bool,
    pub in_daily_returns_window: bool,
}

/// Everything the analysis needs from one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSections {
    pub daily_returns: Vec<ReportRow>,
    pub trade_log: Vec<ReportRow>,
    pub active_strategy: String,
    pub symbol: String,
}

impl ExtractedSections {
    /// Active strategy label without its "(On)" tag or surrounding spaces.
    pub fn strategy_name(&self) -> String {
        self.active_strategy
            .replace(ACTIVE_STRATEGY_TAG, "")
            .trim()
            .to_string()
    }
}

#[derive(Debug, Default)]
pub struct SectionExtractor {
    state: ExtractorState,
    daily_returns: Vec<ReportRow>,
    trade_log: Vec<ReportRow>,
    active_strategy: Option<String>,
    symbol: Option<String>,
}

impl SectionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Route one row. Rules are checked in order and the first match wins.
    pub fn feed(&mut self, row: ReportRow) -> SectionTag {
        let state = &mut self.state;

        if row.is_blank() {
            return SectionTag::Unclassified;
        }

        if row.has_marker(TRADES_LIST_END) {
            state.in_trade_log = false;
            return SectionTag::Unclassified;
        }
        if row.has_marker(TRADES_LIST_START) {
            state.in_trade_log = true;
            return SectionTag::TradeLog;
        }
        if state.in_trade_log {
            self.trade_log.push(row);
            return SectionTag::TradeLog;
        }

        if row.has_marker(DAILY_RETURNS) {
            state.in_daily_returns_candidate = true;
            return SectionTag::DailyReturns;
        }
        if row.has_marker(ROLLING_PERIOD_ANALYSIS) {
            state.in_daily_returns_window = false;
            state.in_daily_returns_candidate = false;
            return SectionTag::Unclassified;
        }
        if row.has_marker(PERIOD_ANALYSIS) {
            state.in_daily_returns_window = true;
            return SectionTag::DailyReturns;
        }
        if state.in_daily_returns_window && state.in_daily_returns_candidate {
            self.daily_returns.push(row);
            return SectionTag::DailyReturns;
        }

        if row.has_marker(SYMBOL) {
            if let [_, symbol] = row.non_empty_cells()[..] {
                self.symbol = Some(symbol.to_string());
            }
            return SectionTag::Unclassified;
        }

        if row.has_marker(STRATEGIES_APPLIED) {
            state.in_strategy_block = true;
            return SectionTag::StrategyBlock;
        }
        if row.has_marker(STRATEGY_INPUTS) {
            state.in_strategy_block = false;
            return SectionTag::Unclassified;
        }
        if state.in_strategy_block {
            if let Some(first) = row.first().filter(|c| c.contains(ACTIVE_STRATEGY_TAG)) {
                self.active_strategy = Some(first.to_string());
            }
            return SectionTag::StrategyBlock;
        }

        SectionTag::Unclassified
    }

    /// Close the pass, failing if any required section was never seen.
    pub fn finish(self) -> Result<ExtractedSections, ReportError> {
        debug!(
            daily_rows = self.daily_returns.len(),
            trade_rows = self.trade_log.len(),
            "section extraction finished"
        );

        if self.daily_returns.is_empty() {
            return Err(ReportError::SectionNotFound {
                what: format!("daily returns ({DAILY_RETURNS:?} / {PERIOD_ANALYSIS:?})"),
            });
        }
        if self.trade_log.is_empty() {
            return Err(ReportError::SectionNotFound {
                what: format!("trade log ({TRADES_LIST_START:?})"),
            });
        }
        let active_strategy = self.active_strategy.ok_or_else(|| ReportError::SectionNotFound {
            what: format!("active strategy ({STRATEGIES_APPLIED:?} entry tagged {ACTIVE_STRATEGY_TAG:?})"),
        })?;
        let symbol = self.symbol.ok_or_else(|| ReportError::SectionNotFound {
            what: format!("symbol ({SYMBOL:?} row)"),
        })?;

        Ok(ExtractedSections {
            daily_returns: self.daily_returns,
            trade_log: self.trade_log,
            active_strategy,
            symbol,
        })
    }
}

/// Run the extractor over a whole report.
pub fn extract_sections<I>(rows: I) -> Result<ExtractedSections, ReportError>
where
    I: IntoIterator<Item = ReportRow>,
{
    let mut extractor = SectionExtractor::new();
    for row in rows {
        extractor.feed(row);
    }
    extractor.finish()
}
