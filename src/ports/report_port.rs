//! Report loading port trait.

use crate::domain::error::ReportError;
use crate::domain::report_row::ReportRow;
use std::path::Path;

/// Port for loading one report export as rows of cells.
///
/// Decoding and row/cell splitting live behind this trait; the domain only
/// ever sees [`ReportRow`] values.
pub trait ReportSource {
    fn read_rows(&self, path: &Path) -> Result<Vec<ReportRow>, ReportError>;
}
