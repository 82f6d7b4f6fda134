//! Domain error types.

/// Top-level error type for tsweekly.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("malformed {section} section: {reason}")]
    MalformedSection { section: String, reason: String },

    #[error("section not found: {what}")]
    SectionNotFound { what: String },

    #[error("unparseable date {value:?} (expected {format})")]
    DateParseFailure { value: String, format: String },

    #[error("no numeric value in {column} cell {value:?}")]
    NumericParseFailure { column: String, value: String },

    #[error("amount overflow while summing {what}")]
    AmountOverflow { what: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<ReportError>,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// Attach the identity of the file being processed.
    pub fn in_file(self, file: impl Into<String>) -> Self {
        match self {
            already @ ReportError::InFile { .. } => already,
            other => ReportError::InFile {
                file: file.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying failure, looking through any file wrapper.
    pub fn root(&self) -> &ReportError {
        match self {
            ReportError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<&ReportError> for std::process::ExitCode {
    fn from(err: &ReportError) -> Self {
        let code: u8 = match err.root() {
            ReportError::Io(_) | ReportError::Csv(_) => 1,
            ReportError::ConfigParse { .. } | ReportError::ConfigInvalid { .. } => 2,
            ReportError::MalformedSection { .. } | ReportError::SectionNotFound { .. } => 3,
            ReportError::DateParseFailure { .. }
            | ReportError::NumericParseFailure { .. }
            | ReportError::AmountOverflow { .. } => 4,
            ReportError::InFile { .. } => 1,
        };
        std::process::ExitCode::from(code)
    }
}
