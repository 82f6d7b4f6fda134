//! Header-keyed raw tables built from collected report rows.

use crate::domain::error::ReportError;
use crate::domain::report_row::ReportRow;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<String>,
}

/// Text cells grouped into named columns, in header order.
///
/// Columns can be under-filled when source rows were shorter than the
/// header; reads past the end of a column return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    columns: Vec<Column>,
}

impl RawTable {
    /// Build a table from a header row followed by data rows.
    ///
    /// The column under an empty header cell is dropped. Cells past the
    /// header length are ignored. A repeated header name keeps its first
    /// position; later columns with the same name are ignored.
    pub fn build(section: &str, rows: &[ReportRow]) -> Result<Self, ReportError> {
        let (header, body) = rows
            .split_first()
            .ok_or_else(|| ReportError::MalformedSection {
                section: section.to_string(),
                reason: "no header row".into(),
            })?;

        // Column slot per header position; None for dropped positions.
        let mut slots: Vec<Option<usize>> = Vec::with_capacity(header.len());
        let mut columns: Vec<Column> = Vec::new();
        for name in header.cells() {
            if name.is_empty() || columns.iter().any(|c| &c.name == name) {
                slots.push(None);
                continue;
            }
            slots.push(Some(columns.len()));
            columns.push(Column {
                name: name.clone(),
                cells: Vec::with_capacity(body.len()),
            });
        }

        let mut ragged = 0usize;
        for row in body {
            if row.len() > header.len() {
                ragged += 1;
            }
            for (cell, slot) in row.cells().iter().zip(&slots) {
                if let Some(idx) = slot {
                    columns[*idx].cells.push(cell.clone());
                }
            }
        }
        if ragged > 0 {
            warn!(section, ragged, "rows longer than header, extra cells ignored");
        }

        Ok(Self { columns })
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_slice())
    }

    /// Like [`column`](Self::column) but fails with `MalformedSection`.
    pub fn require_column(&self, section: &str, name: &str) -> Result<&[String], ReportError> {
        self.column(name)
            .ok_or_else(|| ReportError::MalformedSection {
                section: section.to_string(),
                reason: format!("missing column {name:?}"),
            })
    }

    pub fn cell(&self, column: &str, row: usize) -> Option<&str> {
        self.column(column)
            .and_then(|cells| cells.get(row))
            .map(String::as_str)
    }

    /// Number of body rows: the length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}
