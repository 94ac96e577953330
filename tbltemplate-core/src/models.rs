//! Core data models for catalog metadata and resolved templates.

use serde::{Deserialize, Serialize};

/// Column metadata returned by a catalog, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Column is fed by a sequence (`serial`/`bigserial` default) or is an
    /// identity column
    pub is_serial: bool,
}

impl ColumnInfo {
    /// Creates a plain, non-serial column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_serial: false,
        }
    }

    /// Creates a sequence-backed column.
    pub fn serial(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_serial: true,
        }
    }
}

/// One output sheet: a table name and the header cells for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableTemplate {
    pub name: String,
    pub columns: Vec<String>,
}

impl TableTemplate {
    /// Creates a template for `name` with `columns` as its header row.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Number of header cells.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
