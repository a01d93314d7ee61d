//! JSON rendering for transaction tables.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{TransactionRecord, TransactionTable};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

#[derive(Serialize)]
struct FlatTable<'a> {
    headers: &'a [String],
    rows: &'a [TransactionRecord],
}

/// Convert a table to `{"headers": [...], "rows": [[...], ...]}`.
pub fn to_json(table: &TransactionTable, format: JsonFormat) -> Result<String> {
    let flat = FlatTable {
        headers: &table.headers,
        rows: &table.records,
    };
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&flat),
        JsonFormat::Compact => serde_json::to_string(&flat),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
