//! Row types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ordered sequence of trimmed cell strings.
///
/// Rows derived from the same table region are positionally aligned, but
/// their lengths may differ: OCR output routinely drops trailing cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    /// Cell texts, left to right
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(Into::into).collect())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }

    /// Cell text at `index`, or `""` past the end of the row.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(|c| c.trim()).unwrap_or("")
    }

    /// Cells joined with single spaces.
    pub fn plain_text(&self) -> String {
        self.cells.join(" ")
    }

    /// Lower-cased [`plain_text`](Self::plain_text), used for keyword tests.
    pub fn search_text(&self) -> String {
        self.plain_text().to_lowercase()
    }

    /// Whether any cell contains an ASCII digit.
    pub fn has_digit(&self) -> bool {
        self.cells
            .iter()
            .any(|c| c.chars().any(|ch| ch.is_ascii_digit()))
    }

    /// Pad with empty cells until the row has at least `len` cells.
    pub fn pad_to(&mut self, len: usize) {
        if self.cells.len() < len {
            self.cells.resize(len, String::new());
        }
    }

    /// Pad or truncate to exactly `len` cells.
    pub fn fit_to(mut self, len: usize) -> Self {
        self.cells.resize(len, String::new());
        self
    }

    /// Consume the row and return its cells.
    pub fn into_cells(self) -> Vec<String> {
        self.cells
    }
}

impl From<Vec<String>> for TableRow {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

/// The row that declares a table's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    /// Position of the header within the tokenized row sequence
    pub index: usize,

    /// Header cells; their texts become the output column names
    pub row: TableRow,
}

impl HeaderRow {
    /// Create a header row.
    pub fn new(index: usize, row: TableRow) -> Self {
        Self { index, row }
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.row.cells
    }

    /// Number of columns the header declares.
    pub fn column_count(&self) -> usize {
        self.row.len()
    }

    /// Check whether `other` repeats this header (e.g. at the top of a new page).
    ///
    /// Comparison ignores case, surrounding whitespace and trailing empty cells.
    pub fn is_repeated_by(&self, other: &TableRow) -> bool {
        let significant = |row: &TableRow| -> Vec<String> {
            let mut cells: Vec<String> = row
                .cells
                .iter()
                .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
                .collect();
            while cells.last().is_some_and(|c| c.is_empty()) {
                cells.pop();
            }
            cells
        };
        let own = significant(&self.row);
        !own.is_empty() && own == significant(other)
    }
}

/// One reconstructed transaction.
///
/// After normalization a record has exactly as many cells as the header has
/// columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord {
    cells: Vec<String>,
}

const LONG_YEAR_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y"];
const SHORT_YEAR_FORMATS: &[&str] = &["%d-%m-%y", "%d/%m/%y"];

impl TransactionRecord {
    /// Create a record from a normalized row.
    pub fn new(row: TableRow) -> Self {
        Self { cells: row.cells }
    }

    /// Cells in header order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Cell text at `index`, or `""` past the end.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the record has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Parse the cell at `date_index` as a day-first calendar date.
    pub fn parsed_date(&self, date_index: usize) -> Option<NaiveDate> {
        let raw = self.cell(date_index).split_whitespace().next()?;
        let year = raw.rsplit(|c: char| c == '-' || c == '/').next()?;
        let formats = if year.len() == 2 {
            SHORT_YEAR_FORMATS
        } else {
            LONG_YEAR_FORMATS
        };
        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }

    /// Convert back into a plain row.
    pub fn into_row(self) -> TableRow {
        TableRow::new(self.cells)
    }
}
