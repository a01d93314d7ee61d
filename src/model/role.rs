//! Column roles.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Semantic meaning of a statement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Transaction (posting/value) date
    Date,
    /// Narration / particulars text
    Description,
    /// Withdrawal amount
    Debit,
    /// Deposit amount
    Credit,
    /// Running balance
    Balance,
    /// Single signed amount column
    Amount,
}

impl ColumnRole {
    /// All roles, in rule-table priority order.
    pub const ALL: [ColumnRole; 6] = [
        ColumnRole::Date,
        ColumnRole::Description,
        ColumnRole::Debit,
        ColumnRole::Credit,
        ColumnRole::Balance,
        ColumnRole::Amount,
    ];

    /// Lower-case role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Date => "date",
            ColumnRole::Description => "description",
            ColumnRole::Debit => "debit",
            ColumnRole::Credit => "credit",
            ColumnRole::Balance => "balance",
            ColumnRole::Amount => "amount",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from column index to role for one table.
///
/// Each role occupies at most one column and the date role is always
/// present; [`ColumnRoleMap::from_assignments`] enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoleMap {
    columns: Vec<Option<ColumnRole>>,
    date: usize,
}

impl ColumnRoleMap {
    /// Build a map from per-column role tags.
    ///
    /// When several columns claim the same role the left-most keeps it and
    /// the others become unmapped. Fails with [`Error::DateColumnMissing`]
    /// if no column is tagged as a date.
    pub fn from_assignments(mut columns: Vec<Option<ColumnRole>>, header: &[String]) -> Result<Self> {
        let mut seen: Vec<ColumnRole> = Vec::new();
        for (idx, slot) in columns.iter_mut().enumerate() {
            if let Some(role) = *slot {
                if seen.contains(&role) {
                    log::warn!(
                        "column {} ({:?}) also looks like {}; keeping the earlier column",
                        idx,
                        header.get(idx).map(String::as_str).unwrap_or(""),
                        role
                    );
                    *slot = None;
                } else {
                    seen.push(role);
                }
            }
        }

        let date = columns
            .iter()
            .position(|slot| *slot == Some(ColumnRole::Date))
            .ok_or_else(|| Error::DateColumnMissing {
                header: header.to_vec(),
            })?;

        Ok(Self { columns, date })
    }

    /// Column index of the date role.
    pub fn date(&self) -> usize {
        self.date
    }

    /// Column index assigned to `role`, if any.
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.columns.iter().position(|slot| *slot == Some(role))
    }

    /// Check whether `role` is mapped.
    pub fn contains(&self, role: ColumnRole) -> bool {
        self.get(role).is_some()
    }

    /// Role assigned to column `index`, if any.
    pub fn role_of(&self, index: usize) -> Option<ColumnRole> {
        self.columns.get(index).copied().flatten()
    }

    /// Largest mapped column index.
    pub fn max_index(&self) -> usize {
        self.columns
            .iter()
            .rposition(Option::is_some)
            .unwrap_or(self.date)
    }

    /// Column whose emptiness marks a continuation row: the balance column,
    /// falling back to a single amount column.
    pub fn anchor(&self) -> Option<usize> {
        self.get(ColumnRole::Balance)
            .or_else(|| self.get(ColumnRole::Amount))
    }

    /// Number of columns the map was built for.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterate over mapped `(role, index)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, usize)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|role| (role, idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_role_map_basic() {
        let map = ColumnRoleMap::from_assignments(
            vec![Some(ColumnRole::Date), Some(ColumnRole::Description), None, Some(ColumnRole::Balance)],
            &header(&["Date", "Narration", "Ref", "Balance"]),
        )
        .unwrap();

        assert_eq!(map.date(), 0);
        assert_eq!(map.get(ColumnRole::Balance), Some(3));
        assert_eq!(map.role_of(2), None);
        assert_eq!(map.max_index(), 3);
        assert_eq!(map.anchor(), Some(3));
    }

    #[test]
    fn test_duplicate_role_keeps_first() {
        let map = ColumnRoleMap::from_assignments(
            vec![Some(ColumnRole::Date), Some(ColumnRole::Date), Some(ColumnRole::Amount)],
            &header(&["Txn Date", "Value Date", "Amount"]),
        )
        .unwrap();

        assert_eq!(map.date(), 0);
        assert_eq!(map.role_of(1), None);
        assert_eq!(map.anchor(), Some(2));
    }

    #[test]
    fn test_missing_date_fails() {
        let result = ColumnRoleMap::from_assignments(
            vec![None, Some(ColumnRole::Description), Some(ColumnRole::Balance)],
            &header(&["Sr", "Particulars", "Balance"]),
        );
        assert!(matches!(result, Err(Error::DateColumnMissing { .. })));
    }

    #[test]
    fn test_no_anchor_without_balance_or_amount() {
        let map = ColumnRoleMap::from_assignments(
            vec![Some(ColumnRole::Date), Some(ColumnRole::Debit), Some(ColumnRole::Credit)],
            &header(&["Date", "Debit", "Credit"]),
        )
        .unwrap();
        assert_eq!(map.anchor(), None);
        assert_eq!(map.iter().count(), 3);
    }
}
