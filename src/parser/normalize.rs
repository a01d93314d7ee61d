//! Final record normalization and safety filtering.

use std::collections::HashSet;

use regex::Regex;

use crate::model::{ExclusionVocabulary, ExtractionStats, TableRow, TransactionRecord};

/// Why a merged row was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Picked up an exclusion term, usually through merging
    Excluded(String),
    /// No cell contains a digit
    NoDigit,
    /// The date cell does not look like a date
    NoDate,
}

/// Fits merged rows to the header width and filters out non-transactions.
pub struct Normalizer<'a> {
    width: usize,
    date_index: usize,
    exclusions: &'a ExclusionVocabulary,
    date_pattern: &'a Regex,
    dedupe: bool,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer for a header of `width` columns.
    pub fn new(
        width: usize,
        date_index: usize,
        exclusions: &'a ExclusionVocabulary,
        date_pattern: &'a Regex,
    ) -> Self {
        Self {
            width,
            date_index,
            exclusions,
            date_pattern,
            dedupe: false,
        }
    }

    /// Drop exact duplicate records, keeping the first.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Check a row that is already fitted to the header width.
    pub fn check(&self, row: &TableRow) -> Result<(), Rejection> {
        if let Some(term) = self.exclusions.find(&row.search_text()) {
            return Err(Rejection::Excluded(term.to_string()));
        }
        if !row.has_digit() {
            return Err(Rejection::NoDigit);
        }
        if !self.date_pattern.is_match(row.cell(self.date_index)) {
            return Err(Rejection::NoDate);
        }
        Ok(())
    }

    /// Normalize `rows` into records, keeping input order.
    pub fn normalize(
        &self,
        rows: impl IntoIterator<Item = TableRow>,
        stats: &mut ExtractionStats,
    ) -> Vec<TransactionRecord> {
        let mut records = Vec::new();

        for row in rows {
            let row = row.fit_to(self.width);
            if let Err(reason) = self.check(&row) {
                log::trace!("rejected ({:?}): [{}]", reason, row.cells.join(" | "));
                match reason {
                    Rejection::Excluded(_) => stats.rejected_excluded += 1,
                    Rejection::NoDigit => stats.rejected_no_digit += 1,
                    Rejection::NoDate => stats.rejected_no_date += 1,
                }
                continue;
            }
            records.push(TransactionRecord::new(row));
        }
        if self.dedupe {
            records = dedupe_records(records, stats);
        }

        log::debug!(
            "normalizer: kept {} records, rejected {}",
            records.len(),
            stats.rejected_total()
        );
        records
    }
}

/// Remove exact duplicate records, keeping the first occurrence of each.
pub fn dedupe_records(
    records: Vec<TransactionRecord>,
    stats: &mut ExtractionStats,
) -> Vec<TransactionRecord> {
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(records.len());
    let before = records.len();
    let kept: Vec<TransactionRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.cells().to_vec()))
        .collect();
    stats.duplicates_removed += (before - kept.len()) as u32;
    kept
}
