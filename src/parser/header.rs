//! Header row location by content signature.
//!
//! Some statements print account metadata, addresses or summary boxes
//! before the transaction table, so the whole row sequence is scanned
//! rather than a fixed position.

use crate::error::{Error, Result};
use crate::model::{HeaderRow, TableRow};

/// Content test deciding whether a row declares a transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSignature {
    /// A date token plus a balance or amount token
    Layout,
    /// A date token plus "particulars", as printed by grid-extracted statements
    Grid,
}

impl HeaderSignature {
    /// Check whether `row` carries this signature.
    pub fn matches(&self, row: &TableRow) -> bool {
        let text = row.search_text();
        if !text.contains("date") {
            return false;
        }
        match self {
            HeaderSignature::Layout => text.contains("balance") || text.contains("amount"),
            HeaderSignature::Grid => text.contains("particulars"),
        }
    }
}

/// Find the first row with the layout signature.
///
/// Fails with [`Error::HeaderNotFound`] when no row qualifies.
pub fn locate_header(rows: &[TableRow]) -> Result<HeaderRow> {
    match find_header(rows, rows.len(), &[HeaderSignature::Layout]) {
        Some(header) => {
            log::debug!(
                "header found at row {}: [{}]",
                header.index,
                header.names().join(" | ")
            );
            Ok(header)
        }
        None => Err(Error::HeaderNotFound {
            rows_scanned: rows.len(),
        }),
    }
}

/// Find the first row among the leading `limit` rows that matches any of
/// `signatures`.
pub fn find_header(
    rows: &[TableRow],
    limit: usize,
    signatures: &[HeaderSignature],
) -> Option<HeaderRow> {
    rows.iter()
        .take(limit)
        .enumerate()
        .find(|(_, row)| signatures.iter().any(|sig| sig.matches(row)))
        .map(|(index, row)| HeaderRow::new(index, row.clone()))
}
