//! Row/column model shared by every pipeline stage.
//!
//! Raw text becomes [`TableRow`]s, one of which is singled out as the
//! [`HeaderRow`]. Data rows are folded into [`TransactionRecord`]s and frozen
//! into a [`TransactionTable`] handed to the emitter.

mod grid;
mod role;
mod stats;
mod table;
mod transaction_table;
mod vocabulary;

pub use grid::{CellGrid, GridRegion};
pub use role::{ColumnRole, ColumnRoleMap};
pub use stats::ExtractionStats;
pub use table::{HeaderRow, TableRow, TransactionRecord};
pub use transaction_table::TransactionTable;
pub use vocabulary::{ExclusionVocabulary, DEFAULT_EXCLUSION_TERMS};
