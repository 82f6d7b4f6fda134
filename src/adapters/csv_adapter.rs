//! CSV report reader and result writer.

use crate::domain::analysis::{AnalysisResult, COLUMNS};
use crate::domain::config::OutputConfig;
use crate::domain::error::ReportError;
use crate::domain::report_row::ReportRow;
use crate::ports::report_port::ReportSource;
use crate::ports::result_port::ResultSink;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a report export as CSV with no header and rows of any width.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportReader;

impl CsvReportReader {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_rows<R: io::Read>(reader: R) -> Result<Vec<ReportRow>, ReportError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(ReportRow::new(record.iter().map(str::to_string).collect()));
        }
        Ok(rows)
    }
}

impl ReportSource for CsvReportReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<ReportRow>, ReportError> {
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        let rows = Self::parse_rows(content.as_bytes())?;
        debug!(path = %path.display(), rows = rows.len(), "report loaded");
        Ok(rows)
    }
}

/// Write `result` as CSV: one header row, then one row per date.
pub fn write_result<W: Write>(result: &AnalysisResult, writer: W) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in &result.rows {
        wtr.write_record(result.record(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Stores results as `<stem><suffix>.csv` files in one directory.
#[derive(Debug, Clone)]
pub struct CsvResultWriter {
    output: OutputConfig,
}

impl CsvResultWriter {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    pub fn output_path(&self, source_name: &str) -> PathBuf {
        self.output
            .directory
            .join(self.output.file_name_for(source_name))
    }
}

impl ResultSink for CsvResultWriter {
    fn store(&self, result: &AnalysisResult, source_name: &str) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(&self.output.directory)?;
        let path = self.output_path(source_name);
        let file = fs::File::create(&path)?;
        write_result(result, io::BufWriter::new(file))?;
        debug!(path = %path.display(), rows = result.rows.len(), "result written");
        Ok(path)
    }
}
