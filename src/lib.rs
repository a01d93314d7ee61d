//! # stmtable
//!
//! Transaction-table reconstruction for bank statements.
//!
//! OCR and PDF table extractors hand over statements as noisy tables:
//! narration wraps onto extra lines, borders are interleaved with data,
//! totals and brought-forward rows sit among real transactions and every
//! bank words its header differently. This library turns that into one
//! clean row per transaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use stmtable::{extract_file, render};
//!
//! fn main() -> stmtable::Result<()> {
//!     let table = extract_file("statement.txt")?;
//!
//!     println!("{}", render::to_markdown(&table));
//!     for record in table.iter_keyed() {
//!         println!("{:?}", record);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Inputs
//!
//! - **Layout text**: pipe-delimited rows as produced by layout-preserving OCR
//! - **Cell grids**: table regions from a PDF table extractor, as JSON
//! - **OCR payloads**: the OCR service's retrieve response
//! - **Model responses**: `{"headers", "rows"}` JSON from a language model
//!
//! ## Features
//!
//! - **Continuation merging**: wrapped narration is folded into its transaction
//! - **Header inference**: header row found by content, column roles by keyword rules
//! - **Safety filter**: totals, summaries and rows without a date are dropped
//! - **Parallel batches**: independent documents are processed with Rayon

pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod upstream;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, ConverterRegistry, SourceConverter};
pub use detect::{detect_input_format, InputFormat};
pub use error::{Error, Result, Stage};
pub use model::{
    CellGrid, ColumnRole, ColumnRoleMap, ExclusionVocabulary, ExtractionStats, GridRegion,
    HeaderRow, TableRow, TransactionRecord, TransactionTable,
};
pub use parser::{ExtractOptions, RoleRule, StatementParser};
pub use render::{JsonFormat, OutputFormat};

use std::path::Path;

use rayon::prelude::*;

/// Reconstruct the transaction table from layout text.
///
/// # Example
///
/// ```
/// let text = "\
/// | Date       | Narration | Debit | Balance |
/// | 01-01-2024 | ATM WDL   | 500   | 1000    |
/// |            | REF 12345 |       |         |
/// ";
/// let table = stmtable::extract_from_text(text).unwrap();
/// assert_eq!(table.get(0, "Narration"), Some("ATM WDL REF 12345"));
/// ```
pub fn extract_from_text(text: &str) -> Result<TransactionTable> {
    extract_from_text_with_options(text, &ExtractOptions::default())
}

/// Reconstruct the transaction table from layout text with custom options.
pub fn extract_from_text_with_options(text: &str, options: &ExtractOptions) -> Result<TransactionTable> {
    StatementParser::from_text_with_options(text, options.clone()).parse()
}

/// Reconstruct the transaction table from a cell grid.
pub fn extract_from_grid(grid: CellGrid, options: &ExtractOptions) -> Result<TransactionTable> {
    StatementParser::from_grid_with_options(grid, options.clone()).parse()
}

/// Reconstruct the transaction table from content of any supported
/// representation, detecting which one it is.
pub fn extract_from_content(content: &str, options: &ExtractOptions) -> Result<TransactionTable> {
    StatementParser::from_content(content, None, options.clone())?.parse()
}

/// Reconstruct the transaction table from a file.
///
/// # Example
///
/// ```no_run
/// use stmtable::extract_file;
///
/// let table = extract_file("statement.txt").unwrap();
/// println!("{} transactions", table.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<TransactionTable> {
    StatementParser::open(path)?.parse()
}

/// Reconstruct the transaction table from a file with custom options.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<TransactionTable> {
    StatementParser::open_with_options(path, options.clone())?.parse()
}

/// Reconstruct tables for many documents.
///
/// Each entry is the content of one document. Results come back in input
/// order; one failing document does not affect the others.
pub fn extract_batch(documents: &[String], options: &ExtractOptions) -> Vec<Result<TransactionTable>> {
    log::debug!(
        "batch of {} documents ({})",
        documents.len(),
        if options.parallel { "parallel" } else { "sequential" }
    );
    if options.parallel {
        documents
            .par_iter()
            .map(|content| extract_from_content(content, options))
            .collect()
    } else {
        documents
            .iter()
            .map(|content| extract_from_content(content, options))
            .collect()
    }
}

/// Reconstruct tables for many files; see [`extract_batch`].
pub fn extract_file_batch<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &ExtractOptions,
) -> Vec<Result<TransactionTable>> {
    if options.parallel {
        paths
            .par_iter()
            .map(|path| extract_file_with_options(path, options))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| extract_file_with_options(path, options))
            .collect()
    }
}

/// Reconstruct the transaction table from a file, reading it asynchronously.
#[cfg(feature = "async")]
pub async fn extract_file_async<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<TransactionTable> {
    let content = tokio::fs::read_to_string(path).await?;
    extract_from_content(&content, options)
}

/// Builder for extracting transaction tables.
///
/// # Example
///
/// ```no_run
/// use stmtable::Stmtable;
///
/// let csv = Stmtable::new()
///     .exclude("interest")
///     .dedupe()
///     .extract_file("statement.txt")?
///     .to_csv()?;
/// # Ok::<(), stmtable::Error>(())
/// ```
pub struct Stmtable {
    options: ExtractOptions,
    input_format: Option<InputFormat>,
}

impl Stmtable {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
            input_format: None,
        }
    }

    /// Replace all extraction options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the cell delimiter of layout text.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.options = self.options.with_delimiter(delimiter);
        self
    }

    /// Add an exclusion term.
    pub fn exclude(mut self, term: impl AsRef<str>) -> Self {
        self.options = self.options.with_extra_exclusions([term]);
        self
    }

    /// Set the date pattern.
    pub fn with_date_pattern(mut self, pattern: &str) -> Result<Self> {
        self.options = self.options.with_date_pattern(pattern)?;
        Ok(self)
    }

    /// Drop exact duplicate records.
    pub fn dedupe(mut self) -> Self {
        self.options = self.options.with_dedupe(true);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Force the input representation instead of detecting it.
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// The extraction options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract from content.
    pub fn extract(self, content: &str) -> Result<StmtableResult> {
        let table = StatementParser::from_content(content, self.input_format, self.options)?.parse()?;
        Ok(StmtableResult { table })
    }

    /// Extract from a file.
    pub fn extract_file<P: AsRef<Path>>(self, path: P) -> Result<StmtableResult> {
        let content = std::fs::read_to_string(path)?;
        self.extract(&content)
    }

    /// Extract from a cell grid.
    pub fn extract_grid(self, grid: CellGrid) -> Result<StmtableResult> {
        let table = StatementParser::from_grid_with_options(grid, self.options).parse()?;
        Ok(StmtableResult { table })
    }
}

impl Default for Stmtable {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of an extraction, ready to render.
pub struct StmtableResult {
    /// The reconstructed table
    pub table: TransactionTable,
}

impl StmtableResult {
    /// Convert to CSV.
    pub fn to_csv(&self) -> Result<String> {
        render::to_csv(&self.table)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.table, format)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.table)
    }

    /// Get the table.
    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    /// Take the table.
    pub fn into_table(self) -> TransactionTable {
        self.table
    }
}
