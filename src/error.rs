//! Error types for stmtable library.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for stmtable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading input or sniffing its format
    Input,
    /// Searching for the header row
    HeaderLocator,
    /// Assigning semantic roles to header columns
    ColumnRoleMapper,
    /// Parsing payloads produced by external collaborators
    Upstream,
    /// Serializing the final table
    Render,
    /// Option validation
    Config,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::HeaderLocator => "header locator",
            Stage::ColumnRoleMapper => "column role mapper",
            Stage::Upstream => "upstream",
            Stage::Render => "render",
            Stage::Config => "config",
        };
        f.write_str(name)
    }
}

/// Error types that can occur while reconstructing a transaction table.
///
/// Only structural failures surface here. Noisy rows (short rows, stray
/// delimiters, unparseable fragments) are absorbed by the pipeline and show
/// up in [`ExtractionStats`](crate::model::ExtractionStats) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// No row matched the header signature.
    #[error("header locator: no row looks like a transaction header (scanned {rows_scanned} rows)")]
    HeaderNotFound {
        /// Number of tokenized rows that were examined
        rows_scanned: usize,
    },

    /// A header was found but none of its cells maps to the date role.
    #[error("column role mapper: no date column in header [{}]", header.join(" | "))]
    DateColumnMissing {
        /// The header cells that were inspected
        header: Vec<String>,
    },

    /// An external collaborator returned something that is not the expected structure.
    #[error("upstream: malformed output ({reason}): {excerpt}")]
    MalformedUpstreamOutput {
        /// What was wrong with the payload
        reason: String,
        /// Leading part of the offending payload
        excerpt: String,
    },

    /// An option value could not be used (e.g. invalid regex).
    #[error("config: invalid option: {0}")]
    InvalidOption(String),

    /// The input could not be recognized as any supported representation.
    #[error("input: unsupported input: {0}")]
    UnsupportedInput(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error during rendering (CSV, JSON, Markdown).
    #[error("render: {0}")]
    Render(String),
}

const EXCERPT_LEN: usize = 120;

impl Error {
    /// Build a [`Error::MalformedUpstreamOutput`] with an excerpt of `payload`.
    pub fn malformed(reason: impl Into<String>, payload: &str) -> Self {
        let trimmed = payload.trim();
        let excerpt = match trimmed.char_indices().nth(EXCERPT_LEN) {
            Some((idx, _)) => format!("{}...", &trimmed[..idx]),
            None => trimmed.to_string(),
        };
        Error::MalformedUpstreamOutput {
            reason: reason.into(),
            excerpt,
        }
    }

    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Error::HeaderNotFound { .. } => Stage::HeaderLocator,
            Error::DateColumnMissing { .. } => Stage::ColumnRoleMapper,
            Error::MalformedUpstreamOutput { .. } | Error::Json(_) => Stage::Upstream,
            Error::InvalidOption(_) => Stage::Config,
            Error::UnsupportedInput(_) | Error::Io(_) => Stage::Input,
            Error::Csv(_) | Error::Render(_) => Stage::Render,
        }
    }

    /// Whether this error means no coherent table could be reconstructed.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::HeaderNotFound { .. }
                | Error::DateColumnMissing { .. }
                | Error::MalformedUpstreamOutput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HeaderNotFound { rows_scanned: 7 };
        assert_eq!(
            err.to_string(),
            "header locator: no row looks like a transaction header (scanned 7 rows)"
        );

        let err = Error::DateColumnMissing {
            header: vec!["Sr".into(), "Particulars".into(), "Balance".into()],
        };
        assert_eq!(
            err.to_string(),
            "column role mapper: no date column in header [Sr | Particulars | Balance]"
        );
    }

    #[test]
    fn test_error_stage() {
        assert_eq!(
            Error::HeaderNotFound { rows_scanned: 0 }.stage(),
            Stage::HeaderLocator
        );
        assert_eq!(
            Error::DateColumnMissing { header: vec![] }.stage(),
            Stage::ColumnRoleMapper
        );
        assert_eq!(Error::malformed("bad", "{").stage(), Stage::Upstream);
        assert_eq!(Error::Render("x".into()).stage(), Stage::Render);
    }

    #[test]
    fn test_malformed_excerpt_truncated() {
        let payload = "x".repeat(500);
        match Error::malformed("not json", &payload) {
            Error::MalformedUpstreamOutput { reason, excerpt } => {
                assert_eq!(reason, "not json");
                assert_eq!(excerpt.len(), EXCERPT_LEN + 3);
                assert!(excerpt.ends_with("..."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_structural_errors() {
        assert!(Error::HeaderNotFound { rows_scanned: 1 }.is_structural());
        assert!(Error::malformed("no headers", "{}").is_structural());
        assert!(!Error::UnsupportedInput("x".into()).is_structural());
        assert!(!Error::Render("x".into()).is_structural());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.stage(), Stage::Input);
    }
}
