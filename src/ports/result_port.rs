//! Result storage port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::ReportError;
use std::path::PathBuf;

/// Port for storing a finished analysis.
pub trait ResultSink {
    /// Store `result` under a name derived from `source_name`, returning
    /// where it was written.
    fn store(&self, result: &AnalysisResult, source_name: &str) -> Result<PathBuf, ReportError>;
}
