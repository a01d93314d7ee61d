//! The reconstructed transaction table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ColumnRole, ColumnRoleMap, ExtractionStats, TransactionRecord};

/// Final output of an extraction run: a flat table in statement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTable {
    /// Column names, exactly as written in the statement header
    pub headers: Vec<String>,

    /// Semantic roles of the columns
    pub roles: ColumnRoleMap,

    /// One record per transaction, each `headers.len()` cells wide
    pub records: Vec<TransactionRecord>,

    /// Counters collected during extraction
    pub stats: ExtractionStats,
}

impl TransactionTable {
    /// Create a table.
    pub fn new(
        headers: Vec<String>,
        roles: ColumnRoleMap,
        records: Vec<TransactionRecord>,
        stats: ExtractionStats,
    ) -> Self {
        Self {
            headers,
            roles,
            records,
            stats,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no transaction survived extraction.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first column named `column` (case-insensitive).
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(column.trim()))
    }

    /// Cell of record `row` in the column named `column`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.records.get(row).map(|r| r.cell(col))
    }

    /// Cell of record `row` in the column carrying `role`.
    pub fn get_role(&self, row: usize, role: ColumnRole) -> Option<&str> {
        let col = self.roles.get(role)?;
        self.records.get(row).map(|r| r.cell(col))
    }

    /// Records as `(column name, value)` pairs in header order.
    pub fn iter_keyed(&self) -> impl Iterator<Item = Vec<(&str, &str)>> + '_ {
        self.records.iter().map(move |record| {
            self.headers
                .iter()
                .map(String::as_str)
                .zip(record.cells().iter().map(String::as_str))
                .collect()
        })
    }

    /// Parsed dates of every record, in order.
    pub fn dates(&self) -> Vec<Option<NaiveDate>> {
        let col = self.roles.date();
        self.records.iter().map(|r| r.parsed_date(col)).collect()
    }

    /// First and last parseable dates, in statement order.
    pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates: Vec<NaiveDate> = self.dates().into_iter().flatten().collect();
        Some((*dates.first()?, *dates.last()?))
    }
}
