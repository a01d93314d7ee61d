//! Exclusion vocabulary for non-transaction rows.

use serde::{Deserialize, Serialize};

/// Terms marking totals, carried-forward balances and summary rows.
pub const DEFAULT_EXCLUSION_TERMS: &[&str] = &[
    "total",
    "subtotal",
    "grand total",
    "b/f",
    "brought forward",
    "c/f",
    "carry forward",
    "summary",
    "opening balance",
    "closing balance",
];

/// Case-insensitive substrings whose presence anywhere in a row's text
/// excludes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionVocabulary {
    terms: Vec<String>,
}

impl ExclusionVocabulary {
    /// Build a vocabulary from arbitrary terms. Blank terms are ignored.
    pub fn new<S: AsRef<str>>(terms: impl IntoIterator<Item = S>) -> Self {
        let mut vocabulary = Self { terms: Vec::new() };
        vocabulary.extend(terms);
        vocabulary
    }

    /// An empty vocabulary that excludes nothing.
    pub fn empty() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add more terms.
    pub fn extend<S: AsRef<str>>(&mut self, terms: impl IntoIterator<Item = S>) {
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !self.terms.contains(&term) {
                self.terms.push(term);
            }
        }
    }

    /// Lower-cased terms.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// First term found in `text`, if any.
    pub fn find(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Check whether `text` contains any term.
    pub fn matches(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

impl Default for ExclusionVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSION_TERMS)
    }
}
