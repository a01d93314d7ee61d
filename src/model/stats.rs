//! Extraction statistics.

use serde::{Deserialize, Serialize};

/// Counters collected while reconstructing one document.
///
/// Row-level noise never becomes an error; it is tallied here so callers can
/// judge extraction quality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Physical lines read from layout text
    pub lines_read: u32,

    /// Border / separator lines dropped by the tokenizer
    pub decoration_lines: u32,

    /// Rows produced by the tokenizer
    pub rows_tokenized: u32,

    /// Rows before the header (account metadata, titles)
    pub preamble_rows: u32,

    /// Grid regions examined
    pub regions_scanned: u32,

    /// Grid regions that contained a transaction header
    pub regions_accepted: u32,

    /// Rows dropped for matching the exclusion vocabulary during merging
    pub excluded_rows: u32,

    /// Rows folded into the previous record
    pub continuation_rows: u32,

    /// Page-repeated header rows skipped
    pub repeated_headers: u32,

    /// Merged rows rejected by the final filter for exclusion text
    pub rejected_excluded: u32,

    /// Merged rows rejected for having no digit anywhere
    pub rejected_no_digit: u32,

    /// Merged rows rejected for lacking a date in the date column
    pub rejected_no_date: u32,

    /// Exact duplicate records removed
    pub duplicates_removed: u32,

    /// Records in the final table
    pub records_emitted: u32,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows rejected by the final filter.
    pub fn rejected_total(&self) -> u32 {
        self.rejected_excluded + self.rejected_no_digit + self.rejected_no_date
    }

    /// Fold counters from another pass (e.g. another grid region) into this one.
    pub fn absorb(&mut self, other: &ExtractionStats) {
        self.lines_read += other.lines_read;
        self.decoration_lines += other.decoration_lines;
        self.rows_tokenized += other.rows_tokenized;
        self.preamble_rows += other.preamble_rows;
        self.regions_scanned += other.regions_scanned;
        self.regions_accepted += other.regions_accepted;
        self.excluded_rows += other.excluded_rows;
        self.continuation_rows += other.continuation_rows;
        self.repeated_headers += other.repeated_headers;
        self.rejected_excluded += other.rejected_excluded;
        self.rejected_no_digit += other.rejected_no_digit;
        self.rejected_no_date += other.rejected_no_date;
        self.duplicates_removed += other.duplicates_removed;
        self.records_emitted += other.records_emitted;
    }
}
