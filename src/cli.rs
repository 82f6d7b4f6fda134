//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::{write_result, CsvReportReader, CsvResultWriter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{analyze, AnalysisResult};
use crate::domain::config::{build_analysis_config, build_output_config, AnalysisConfig};
use crate::domain::config_validation::validate_config;
use crate::domain::error::ReportError;
use crate::domain::money::format_currency;
use crate::domain::normalize::parse_report_date;
use crate::domain::section::extract_sections;
use crate::domain::table::RawTable;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportSource;
use crate::ports::result_port::ResultSink;

#[derive(Parser, Debug)]
#[command(
    name = "tsweekly",
    about = "Daily and weekly performance tables from strategy report exports"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert report exports into daily performance CSVs
    Convert {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Directory for result files (overrides [output] directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Write the CSV to stdout instead of a file (single input only)
        #[arg(long)]
        stdout: bool,
        /// Date used as "today" by the end date policy (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Show what the section extractor finds in a report
    Inspect {
        file: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file and print the resolved settings
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Convert {
            files,
            config,
            output_dir,
            stdout,
            today,
        } => run_convert(&files, config.as_ref(), output_dir, stdout, today.as_deref()),
        Command::Inspect { file, config } => run_inspect(&file, config.as_ref()),
        Command::CheckConfig { config } => run_check_config(&config),
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        return Ok(FileConfigAdapter::empty());
    };
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ReportError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Load, validate and resolve the analysis settings.
pub fn resolve_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, ReportError> {
    validate_config(adapter)?;
    build_analysis_config(adapter)
}

pub fn parse_today(value: Option<&str>) -> Result<NaiveDate, ReportError> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            ReportError::ConfigInvalid {
                section: "cli".into(),
                key: "today".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and analyze one report. Failures carry the file name.
pub fn analyze_file(
    source: &dyn ReportSource,
    path: &Path,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Result<AnalysisResult, ReportError> {
    let name = source_name(path);
    let rows = source.read_rows(path).map_err(|e| e.in_file(&name))?;
    analyze(rows, config, today).map_err(|e| e.in_file(&name))
}

/// Analyze one report and hand the result to `sink`.
pub fn process_file(
    source: &dyn ReportSource,
    sink: &dyn ResultSink,
    path: &Path,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Result<(AnalysisResult, PathBuf), ReportError> {
    let name = source_name(path);
    let result = analyze_file(source, path, config, today)?;
    let written = sink.store(&result, &name).map_err(|e| e.in_file(&name))?;
    Ok((result, written))
}

/// Process every file, continuing past failures. Returns the failures.
pub fn convert_all(
    source: &dyn ReportSource,
    sink: &dyn ResultSink,
    files: &[PathBuf],
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Vec<ReportError> {
    let mut failures = Vec::new();
    for path in files {
        match process_file(source, sink, path, config, today) {
            Ok((result, written)) => {
                print_summary(&source_name(path), &result);
                eprintln!("  Written to:   {}", written.display());
            }
            Err(e) => {
                eprintln!("error: couldn't parse file! {e}");
                failures.push(e);
            }
        }
    }
    failures
}

fn run_convert(
    files: &[PathBuf],
    config_path: Option<&PathBuf>,
    output_dir: Option<PathBuf>,
    to_stdout: bool,
    today: Option<&str>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match resolve_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let today = match parse_today(today) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let reader = CsvReportReader::new();

    if to_stdout {
        let [path] = files else {
            eprintln!("error: --stdout takes exactly one file");
            return ExitCode::from(2);
        };
        let result = match analyze_file(&reader, path, &config, today) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: couldn't parse file! {e}");
                return (&e).into();
            }
        };
        return match write_result(&result, io::stdout().lock()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        };
    }

    let mut output = build_output_config(&adapter);
    if let Some(dir) = output_dir {
        output.directory = dir;
    }
    let writer = CsvResultWriter::new(output);

    let failures = convert_all(&reader, &writer, files, &config, today);
    eprintln!(
        "\n{} of {} files converted",
        files.len() - failures.len(),
        files.len()
    );
    match failures.first() {
        Some(e) => e.into(),
        None => ExitCode::SUCCESS,
    }
}

pub fn print_summary(name: &str, result: &AnalysisResult) {
    eprintln!("\n=== {name} ===");
    eprintln!("  Strategy:     {}", result.strategy);
    eprintln!("  Symbol:       {}", result.symbol);
    if let (Some(first), Some(last)) = (result.first_date(), result.last_date()) {
        eprintln!(
            "  Period:       {} to {} ({} days)",
            first,
            last,
            result.rows.len()
        );
    }
    if let Some(row) = result.final_row() {
        eprintln!("  Total Profit: {}", format_currency(row.total_profit));
        eprintln!("  Total Deals:  {}", format_currency(row.total_deals));
        eprintln!("  Weekly Total: {}", format_currency(row.total_weekly_profit));
    }
}

fn run_inspect(path: &PathBuf, config_path: Option<&PathBuf>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match resolve_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match inspect_report(&CsvReportReader::new(), path, &config) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Describe the sections found in a report, one line per fact.
pub fn inspect_report(
    source: &dyn ReportSource,
    path: &Path,
    config: &AnalysisConfig,
) -> Result<Vec<String>, ReportError> {
    let name = source_name(path);
    let rows = source.read_rows(path).map_err(|e| e.in_file(&name))?;
    let sections = extract_sections(rows).map_err(|e| e.in_file(&name))?;
    let daily = RawTable::build("daily returns", &sections.daily_returns)
        .map_err(|e| e.in_file(&name))?;
    let trades =
        RawTable::build("trade log", &sections.trade_log).map_err(|e| e.in_file(&name))?;

    let mut lines = vec![
        format!("file:            {name}"),
        format!("symbol:          {}", sections.symbol),
        format!("active strategy: {}", sections.strategy_name()),
        format!(
            "daily returns:   {} rows [{}]",
            daily.row_count(),
            daily.headers().join(", ")
        ),
        format!(
            "trade log:       {} rows [{}]",
            trades.row_count(),
            trades.headers().join(", ")
        ),
    ];
    if let Some(cumulative) = latest_cell(&daily, &config.columns.date, &config.columns.cumulative)
    {
        lines.push(format!("report {}: {cumulative}", config.columns.cumulative));
    }
    Ok(lines)
}

/// The `value_column` cell on the row with the latest parseable date.
fn latest_cell<'a>(table: &'a RawTable, date_column: &str, value_column: &str) -> Option<&'a str> {
    let dates = table.column(date_column)?;
    let values = table.column(value_column)?;
    dates
        .iter()
        .zip(values)
        .filter_map(|(d, v)| parse_report_date(d).ok().map(|d| (d, v.as_str())))
        .max_by_key(|(d, _)| *d)
        .map(|(_, v)| v)
}

fn run_check_config(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(Some(config_path)) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let config = match resolve_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let output = build_output_config(&adapter);

    eprintln!("\nColumns:");
    eprintln!("  date:        {}", config.columns.date);
    eprintln!("  profit:      {}", config.columns.profit);
    eprintln!("  win_rate:    {}", config.columns.win_rate);
    eprintln!("  cumulative:  {}", config.columns.cumulative);
    eprintln!("  deals:       {}", config.columns.deals);
    eprintln!("  trade_time:  {}", config.columns.trade_time);
    eprintln!("\nAnalysis:");
    eprintln!("  end_date:      {}", config.end_date);
    eprintln!("  week_boundary: {}", config.week_boundary);
    eprintln!("\nOutput:");
    eprintln!("  directory: {}", output.directory.display());
    eprintln!("  suffix:    {}", output.suffix);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
