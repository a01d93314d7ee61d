//! Cell-grid input produced by PDF table extractors.

use serde::{Deserialize, Serialize};

/// One table region detected on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRegion {
    /// 1-based page number, when the extractor reports it
    #[serde(default)]
    pub page: Option<u32>,

    /// Raw cells; `None` marks a cell the extractor could not fill
    pub rows: Vec<Vec<Option<String>>>,
}

impl GridRegion {
    /// Create a region from raw rows.
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { page: None, rows }
    }

    /// Set the page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Create a region from fully populated text rows.
    pub fn from_text_rows<S: Into<String>>(rows: impl IntoIterator<Item = Vec<S>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        )
    }
}

/// Every table region extracted from one document, in reading order.
///
/// Deserializes from either `{"tables": [{"page": 1, "rows": [...]}, ...]}`
/// or a bare array of tables (`[[[cell, ...], ...], ...]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CellGridRepr")]
pub struct CellGrid {
    /// Table regions
    pub tables: Vec<GridRegion>,
}

impl CellGrid {
    /// Create a grid from regions.
    pub fn new(tables: Vec<GridRegion>) -> Self {
        Self { tables }
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the grid has no regions.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellGridRepr {
    Bare(Vec<Vec<Vec<Option<String>>>>),
    Wrapped { tables: Vec<GridRegion> },
}

impl From<CellGridRepr> for CellGrid {
    fn from(repr: CellGridRepr) -> Self {
        match repr {
            CellGridRepr::Bare(tables) => Self {
                tables: tables.into_iter().map(GridRegion::new).collect(),
            },
            CellGridRepr::Wrapped { tables } => Self { tables },
        }
    }
}
