//! One row of a report export, as an ordered list of cells.

/// An ordered sequence of cell strings.
///
/// Marker tests are exact cell membership, never substring containment:
/// "Trades List" is a substring of "TradeStation Trades List" but only a
/// row holding the bare cell "Trades List" carries that marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportRow {
    cells: Vec<String>,
}

impl ReportRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when every cell is the empty string (an empty row counts too).
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.cells.iter().any(|c| c == marker)
    }

    pub fn first(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }

    pub fn non_empty_cells(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect()
    }
}

impl From<Vec<String>> for ReportRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

impl From<&[&str]> for ReportRow {
    fn from(cells: &[&str]) -> Self {
        Self::new(cells.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ReportRow {
    fn from(cells: [&str; N]) -> Self {
        Self::new(cells.iter().map(|c| c.to_string()).collect())
    }
}
