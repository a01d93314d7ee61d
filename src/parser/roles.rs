//! Column role inference from free-text header cells.
//!
//! Statements label the same column differently ("Narration",
//! "Particulars", "Transaction Details"). Roles are assigned by an ordered
//! rule table evaluated against normalized header text; the first rule that
//! matches a cell decides its role.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{ColumnRole, ColumnRoleMap, HeaderRow};

/// One entry of the role rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Role assigned when the rule matches
    pub role: ColumnRole,
    /// The cell must contain at least one of these keywords
    pub any_of: Vec<String>,
    /// The cell must contain none of these keywords
    pub none_of: Vec<String>,
}

impl RoleRule {
    /// Create a rule matching any of `keywords`.
    pub fn new<S: AsRef<str>>(role: ColumnRole, keywords: impl IntoIterator<Item = S>) -> Self {
        Self {
            role,
            any_of: keywords
                .into_iter()
                .map(|k| normalize_header_text(k.as_ref()))
                .collect(),
            none_of: Vec::new(),
        }
    }

    /// Reject cells containing any of `keywords`.
    pub fn excluding<S: AsRef<str>>(mut self, keywords: impl IntoIterator<Item = S>) -> Self {
        self.none_of = keywords
            .into_iter()
            .map(|k| normalize_header_text(k.as_ref()))
            .collect();
        self
    }

    /// Test the rule against already-normalized header text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.any_of.iter().any(|k| normalized.contains(k.as_str()))
            && !self.none_of.iter().any(|k| normalized.contains(k.as_str()))
    }
}

/// The default rule table, in priority order.
pub fn default_role_rules() -> Vec<RoleRule> {
    vec![
        // "Transaction Date" usually duplicates the value date column.
        RoleRule::new(ColumnRole::Date, ["date"]).excluding(["tran"]),
        RoleRule::new(
            ColumnRole::Description,
            ["narration", "description", "details", "particular", "remarks"],
        ),
        RoleRule::new(ColumnRole::Debit, ["debit", "withdrawal"]),
        RoleRule::new(ColumnRole::Credit, ["credit", "deposit"]),
        RoleRule::new(ColumnRole::Balance, ["balance"]),
        RoleRule::new(ColumnRole::Amount, ["amount"]),
    ]
}

/// Normalize header text for keyword matching: NFKC, lower case, single spaces.
pub fn normalize_header_text(text: &str) -> String {
    text.nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Role of a single header cell, or `None` when no rule matches.
pub fn classify_header_cell(text: &str, rules: &[RoleRule]) -> Option<ColumnRole> {
    let normalized = normalize_header_text(text);
    if normalized.is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|rule| rule.matches(&normalized))
        .map(|rule| rule.role)
}

/// Assign roles to every header column.
///
/// Fails with [`Error::DateColumnMissing`](crate::Error::DateColumnMissing)
/// when no column is a date column.
pub fn map_columns(header: &HeaderRow, rules: &[RoleRule]) -> Result<ColumnRoleMap> {
    let assignments: Vec<Option<ColumnRole>> = header
        .names()
        .iter()
        .map(|cell| classify_header_cell(cell, rules))
        .collect();

    for (idx, (name, role)) in header.names().iter().zip(&assignments).enumerate() {
        match role {
            Some(role) => log::trace!("column {} {:?} -> {}", idx, name, role),
            None => log::trace!("column {} {:?} unmapped", idx, name),
        }
    }

    let map = ColumnRoleMap::from_assignments(assignments, header.names())?;
    log::debug!(
        "column roles: {}",
        map.iter()
            .map(|(role, idx)| format!("{}={}", role, idx))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(map)
}
