//! Serializers for reconstructed transaction tables.
//!
//! The output is always one flat table: the header cells followed by the
//! records in statement order.

mod delimited;
mod json;
mod markdown;

pub use delimited::{to_csv, write_csv};
pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::TransactionTable;

/// Output format for a transaction table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Comma-separated values with a header line
    #[default]
    Csv,

    /// Pretty-printed `{"headers", "rows"}` JSON
    Json,

    /// Single-line `{"headers", "rows"}` JSON
    JsonCompact,

    /// Markdown pipe table
    Markdown,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json | OutputFormat::JsonCompact => "json",
            OutputFormat::Markdown => "md",
        }
    }

    /// MIME type of the rendered content.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json | OutputFormat::JsonCompact => "application/json",
            OutputFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::JsonCompact => "json-compact",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "json-compact" | "jsonl" => Ok(OutputFormat::JsonCompact),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(Error::InvalidOption(format!("unknown output format: {}", other))),
        }
    }
}

/// Render a table in the given format.
pub fn render(table: &TransactionTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => to_csv(table),
        OutputFormat::Json => to_json(table, JsonFormat::Pretty),
        OutputFormat::JsonCompact => to_json(table, JsonFormat::Compact),
        OutputFormat::Markdown => Ok(to_markdown(table)),
    }
}
