//! Row classification and continuation merging.
//!
//! Narration that does not fit its column wraps onto extra physical lines.
//! Those lines arrive as rows with an empty date and an empty balance but
//! some description text, and belong to the transaction above them:
//!
//! ```text
//! | 01-01-2024 | ATM WDL   | 500 | 1000 |   <- new transaction
//! |            | REF 12345 |     |      |   <- continuation
//! ```
//!
//! The merger keeps the transaction being built in an accumulator. A
//! continuation produces a new accumulator value from the old one; a new
//! transaction flushes the accumulator to the output.

use crate::model::{ColumnRole, ColumnRoleMap, ExclusionVocabulary, ExtractionStats, HeaderRow, TableRow};

/// How a data row was treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowClass {
    /// Contains an exclusion term; dropped
    Excluded(String),
    /// Repeats the header (page break); dropped
    RepeatedHeader,
    /// Folded into the previous transaction
    Continuation,
    /// Starts a new transaction
    NewTransaction,
}

/// Stateful walker over data rows.
pub struct RowMerger<'a> {
    roles: &'a ColumnRoleMap,
    exclusions: &'a ExclusionVocabulary,
    header: Option<&'a HeaderRow>,
    width: usize,
    accumulator: Option<TableRow>,
    merged: Vec<TableRow>,
    excluded: u32,
    continuations: u32,
    repeated_headers: u32,
}

impl<'a> RowMerger<'a> {
    /// Create a merger for a table with the given roles.
    pub fn new(roles: &'a ColumnRoleMap, exclusions: &'a ExclusionVocabulary) -> Self {
        Self {
            roles,
            exclusions,
            header: None,
            width: roles.max_index() + 1,
            accumulator: None,
            merged: Vec::new(),
            excluded: 0,
            continuations: 0,
            repeated_headers: 0,
        }
    }

    /// Drop rows that repeat `header` without touching the accumulator.
    pub fn skip_repeats_of(mut self, header: &'a HeaderRow) -> Self {
        self.header = Some(header);
        self
    }

    /// Classify `row` against the current state without changing it.
    ///
    /// `row` must already be padded to the mapped width.
    pub fn classify(&self, row: &TableRow) -> RowClass {
        if self.header.is_some_and(|h| h.is_repeated_by(row)) {
            return RowClass::RepeatedHeader;
        }

        if let Some(term) = self.exclusions.find(&row.search_text()) {
            return RowClass::Excluded(term.to_string());
        }

        if self.accumulator.is_some() && self.looks_like_continuation(row) {
            RowClass::Continuation
        } else {
            RowClass::NewTransaction
        }
    }

    fn looks_like_continuation(&self, row: &TableRow) -> bool {
        let date_empty = row.cell(self.roles.date()).is_empty();
        // Without a balance or amount column nothing can prove the row
        // lacks its own amount, so it is never a continuation.
        let anchor_empty = self
            .roles
            .anchor()
            .is_some_and(|idx| row.cell(idx).is_empty());
        let has_description = self
            .roles
            .get(ColumnRole::Description)
            .map_or(true, |idx| !row.cell(idx).is_empty());
        date_empty && anchor_empty && has_description
    }

    /// Feed the next data row.
    pub fn push(&mut self, mut row: TableRow) -> RowClass {
        row.pad_to(self.width);
        let class = self.classify(&row);
        log::trace!("{:?}: [{}]", class, row.cells.join(" | "));

        match &class {
            RowClass::Excluded(_) => self.excluded += 1,
            RowClass::RepeatedHeader => self.repeated_headers += 1,
            RowClass::Continuation => {
                self.continuations += 1;
                self.accumulator = self
                    .accumulator
                    .take()
                    .map(|previous| fold_continuation(previous, &row, self.roles));
            }
            RowClass::NewTransaction => {
                if let Some(done) = self.accumulator.replace(row) {
                    self.merged.push(done);
                }
            }
        }
        class
    }

    /// Flush the accumulator and return merged rows, adding counters to `stats`.
    pub fn finish(mut self, stats: &mut ExtractionStats) -> Vec<TableRow> {
        if let Some(done) = self.accumulator.take() {
            self.merged.push(done);
        }
        stats.excluded_rows += self.excluded;
        stats.continuation_rows += self.continuations;
        stats.repeated_headers += self.repeated_headers;
        self.merged
    }
}

/// Fold a continuation row into the record it continues.
///
/// Empty cells of `previous` take the continuation's value. Filled cells
/// get the value appended after a space, except the date and balance
/// cells, which keep the value from the row that opened the record.
pub fn fold_continuation(mut previous: TableRow, continuation: &TableRow, roles: &ColumnRoleMap) -> TableRow {
    previous.pad_to(continuation.len());
    let date = roles.date();
    let balance = roles.get(ColumnRole::Balance);

    for (idx, value) in continuation.cells.iter().enumerate() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let cell = &mut previous.cells[idx];
        if cell.trim().is_empty() {
            *cell = value.to_string();
        } else if idx != date && Some(idx) != balance {
            cell.push(' ');
            cell.push_str(value);
        }
    }
    previous
}

/// Merge all data rows following the header.
pub fn merge_rows(
    rows: impl IntoIterator<Item = TableRow>,
    roles: &ColumnRoleMap,
    exclusions: &ExclusionVocabulary,
    repeated_header: Option<&HeaderRow>,
    stats: &mut ExtractionStats,
) -> Vec<TableRow> {
    let mut merger = RowMerger::new(roles, exclusions);
    if let Some(header) = repeated_header {
        merger = merger.skip_repeats_of(header);
    }
    for row in rows {
        merger.push(row);
    }
    let before = stats.continuation_rows;
    let merged = merger.finish(stats);
    log::debug!(
        "merger: {} records, {} continuations folded",
        merged.len(),
        stats.continuation_rows - before
    );
    merged
}
