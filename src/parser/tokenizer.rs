//! Row tokenizer for layout-preserving text and cell grids.
//!
//! OCR services that keep the page layout render tables as delimiter rows:
//!
//! ```text
//! +------------+-------------------+---------+
//! | Date       | Narration         | Balance |
//! |============|===================|=========|
//! | 01-01-2024 | ATM WDL           | 1000.00 |
//! |            | REF 12345         |         |
//! ```
//!
//! Only lines that start with the delimiter carry cells. Border lines and
//! prose between tables are dropped silently; noise is expected.

use std::str::Lines;

use crate::model::{ExtractionStats, GridRegion, TableRow};

/// Characters that make up table borders.
const BORDER_GLYPHS: &[char] = &['-', '=', '+', '_', '~', ':', '─', '━', '═', '┼', '╪'];

/// Lazily splits layout text into rows.
///
/// The tokenizer borrows the text and walks it once; it cannot be rewound.
pub struct RowTokenizer<'a> {
    lines: Lines<'a>,
    delimiter: char,
    lines_read: u32,
    decoration_lines: u32,
    rows: u32,
}

impl<'a> RowTokenizer<'a> {
    /// Create a tokenizer over `text` using `delimiter` between cells.
    pub fn new(text: &'a str, delimiter: char) -> Self {
        Self {
            lines: text.lines(),
            delimiter,
            lines_read: 0,
            decoration_lines: 0,
            rows: 0,
        }
    }

    /// Add this tokenizer's counters to `stats`.
    pub fn record_into(&self, stats: &mut ExtractionStats) {
        stats.lines_read += self.lines_read;
        stats.decoration_lines += self.decoration_lines;
        stats.rows_tokenized += self.rows;
    }

    fn tokenize_line(&mut self, raw: &str) -> Option<TableRow> {
        let line = raw.trim();
        if !line.starts_with(self.delimiter) {
            return None;
        }

        if is_decoration(line, self.delimiter) {
            self.decoration_lines += 1;
            log::trace!("decoration line: {:?}", line);
            return None;
        }

        let fragments: Vec<&str> = line.split(self.delimiter).collect();
        if fragments.len() < 3 {
            log::trace!("no enclosed cells: {:?}", line);
            return None;
        }

        let cells: Vec<String> = fragments[1..fragments.len() - 1]
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        Some(TableRow::new(cells))
    }
}

impl Iterator for RowTokenizer<'_> {
    type Item = TableRow;

    fn next(&mut self) -> Option<TableRow> {
        loop {
            let raw = self.lines.next()?;
            self.lines_read += 1;
            if let Some(row) = self.tokenize_line(raw) {
                self.rows += 1;
                return Some(row);
            }
        }
    }
}

/// Check whether a delimiter line is pure border decoration.
pub fn is_decoration(line: &str, delimiter: char) -> bool {
    line.chars()
        .filter(|c| *c != delimiter && !c.is_whitespace())
        .all(|c| BORDER_GLYPHS.contains(&c))
}

/// Tokenize layout text eagerly, recording counters in `stats`.
pub fn tokenize_text(text: &str, delimiter: char, stats: &mut ExtractionStats) -> Vec<TableRow> {
    let mut tokenizer = RowTokenizer::new(text, delimiter);
    let rows: Vec<TableRow> = tokenizer.by_ref().collect();
    tokenizer.record_into(stats);
    log::debug!(
        "tokenizer: {} rows from {} lines ({} decoration)",
        rows.len(),
        stats.lines_read,
        stats.decoration_lines
    );
    rows
}

/// Clean one grid cell: missing cells become empty, line breaks become spaces.
pub fn clean_grid_cell(cell: Option<&str>) -> String {
    cell.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

/// Convert a grid region into rows, dropping rows with no content.
pub fn tokenize_grid_region(region: &GridRegion, stats: &mut ExtractionStats) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(region.rows.len());
    for raw in &region.rows {
        let row = TableRow::new(raw.iter().map(|c| clean_grid_cell(c.as_deref())).collect());
        if row.is_blank() {
            stats.decoration_lines += 1;
            continue;
        }
        rows.push(row);
    }
    stats.rows_tokenized += rows.len() as u32;
    rows
}
