//! Cached view of each destination table's live columns

use crate::error::{DbError, DbResult};
use crate::traits::ColumnDescription;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use ws_core::{Dialect, TableName};
use ws_typing::{kind_from_dwh_type, Column, Columns};

/// Snowflake describes a column without a comment as `<nil>`.
const EMPTY_COMMENT: &str = "<nil>";

/// Column comment written after a column's default value is backfilled
#[derive(Debug, Default, Deserialize)]
struct ColumnComment {
    #[serde(default)]
    backfilled: bool,
}

/// Convert a warehouse description into typed columns.
///
/// A comment of `{"backfilled": true}` marks the column backfilled; any
/// other comment is ignored.
pub fn columns_from_descriptions(dialect: Dialect, descriptions: &[ColumnDescription]) -> Columns {
    descriptions
        .iter()
        .map(|desc| {
            let mut column = Column::new(&desc.name, kind_from_dwh_type(dialect, &desc.data_type));
            if let Some(comment) = desc.comment.as_deref() {
                column.set_backfilled(parse_backfilled(comment));
            }
            column
        })
        .collect()
}

fn parse_backfilled(comment: &str) -> bool {
    let comment = comment.trim();
    if comment.is_empty() || comment == EMPTY_COMMENT {
        return false;
    }
    match serde_json::from_str::<ColumnComment>(comment) {
        Ok(parsed) => parsed.backfilled,
        Err(e) => {
            log::debug!("Ignoring non-JSON column comment '{}': {}", comment, e);
            false
        }
    }
}

/// Per-table column snapshots shared by concurrent flushes.
///
/// Readers get a clone; the cache is only mutated after DDL succeeds.
#[derive(Debug, Default)]
pub struct TableConfigCache {
    tables: RwLock<HashMap<String, Columns>>,
}

impl TableConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Independent copy of the cached columns for `table`
    pub fn get(&self, table: &TableName) -> DbResult<Option<Columns>> {
        let tables = self
            .tables
            .read()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        Ok(tables.get(&table.key()).cloned())
    }

    pub fn insert(&self, table: &TableName, columns: Columns) -> DbResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        tables.insert(table.key(), columns);
        Ok(())
    }

    /// Record columns added to and dropped from `table`
    pub fn apply_changes(&self, table: &TableName, added: &[Column], dropped: &[Column]) -> DbResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        let columns = tables.entry(table.key()).or_default();
        for column in added {
            columns.upsert_column(column.clone());
        }
        for column in dropped {
            columns.delete_column(column.name());
        }
        Ok(())
    }

    /// Forget `table`, forcing the next flush to describe it again
    pub fn evict(&self, table: &TableName) -> DbResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        tables.remove(&table.key());
        Ok(())
    }
}

#[cfg(test)]
#[path = "table_config_test.rs"]
mod tests;
