//! Fully qualified destination table names

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Destination table, e.g. `db.schema.table` (Snowflake, Redshift) or
/// `project.dataset.table` (BigQuery).
///
/// Warehouses resolve unquoted names case-insensitively, so lookups go
/// through [`key`](Self::key) / [`matches`](Self::matches) while the
/// original spelling is kept for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    /// Wrap `name`; debug builds reject an empty name.
    ///
    /// Use [`try_new`](Self::try_new) for names read from files.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "TableName must not be empty");
        Self(name)
    }

    /// `None` when `name` is blank
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        (!name.trim().is_empty()).then_some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used as a map key
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Whether `other` names the same table
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Sibling table `<name>_<suffix>` that one flush is staged into.
    pub fn staging(&self, suffix: &str) -> TableName {
        TableName(format!("{}_{}", self.0, suffix))
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for TableName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "table_name_test.rs"]
mod tests;
