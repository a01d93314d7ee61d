//! Extraction options and configuration.

use regex::Regex;

use super::roles::{default_role_rules, RoleRule};
use crate::error::{Error, Result};
use crate::model::ExclusionVocabulary;

/// Default date shape: `dd-mm-yyyy`, `dd/mm/yy` and friends.
pub const DEFAULT_DATE_PATTERN: &str = r"\d{2}[-/]\d{2}[-/]\d{2,4}";

/// Options for reconstructing transaction tables.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Cell delimiter of layout text rows
    pub delimiter: char,

    /// Terms that mark non-transaction rows
    pub exclusions: ExclusionVocabulary,

    /// Pattern the date cell of every emitted record must contain
    pub date_pattern: Regex,

    /// Ordered header keyword rules
    pub role_rules: Vec<RoleRule>,

    /// Skip header rows repeated at page breaks
    pub skip_repeated_headers: bool,

    /// How many leading rows of a grid region may hold its header
    pub grid_header_scan_rows: usize,

    /// Drop exact duplicate records (first occurrence wins)
    pub dedupe: bool,

    /// Process batches in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the exclusion vocabulary.
    pub fn with_exclusions(mut self, exclusions: ExclusionVocabulary) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Add terms to the exclusion vocabulary.
    pub fn with_extra_exclusions<S: AsRef<str>>(mut self, terms: impl IntoIterator<Item = S>) -> Self {
        self.exclusions.extend(terms);
        self
    }

    /// Set the date pattern.
    pub fn with_date_pattern(mut self, pattern: &str) -> Result<Self> {
        self.date_pattern = Regex::new(pattern)
            .map_err(|e| Error::InvalidOption(format!("date pattern {:?}: {}", pattern, e)))?;
        Ok(self)
    }

    /// Replace the role rule table.
    pub fn with_role_rules(mut self, rules: Vec<RoleRule>) -> Self {
        self.role_rules = rules;
        self
    }

    /// Enable or disable skipping of page-repeated headers.
    pub fn with_skip_repeated_headers(mut self, skip: bool) -> Self {
        self.skip_repeated_headers = skip;
        self
    }

    /// Set how many leading grid rows are searched for a header.
    pub fn with_grid_header_scan_rows(mut self, rows: usize) -> Self {
        self.grid_header_scan_rows = rows.max(1);
        self
    }

    /// Enable or disable duplicate removal.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            delimiter: '|',
            exclusions: ExclusionVocabulary::default(),
            date_pattern: default_date_regex(),
            role_rules: default_role_rules(),
            skip_repeated_headers: true,
            grid_header_scan_rows: 3,
            dedupe: false,
            parallel: true,
        }
    }
}

fn default_date_regex() -> Regex {
    Regex::new(DEFAULT_DATE_PATTERN).expect("DEFAULT_DATE_PATTERN is a valid regex")
}
