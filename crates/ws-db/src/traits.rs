//! Warehouse collaborator traits
//!
//! Drivers implement these; the flush orchestration only ever talks to a
//! warehouse through them.

use crate::error::DbResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use ws_core::TableName;
use ws_typing::Columns;

/// A staged row, keyed by column name
pub type Row = Map<String, Value>;

/// One row of a warehouse's `DESCRIBE TABLE` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    pub data_type: String,
    pub comment: Option<String>,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Reads a table's live schema
#[async_trait]
pub trait SchemaReader: Send + Sync {
    /// Describe the columns of `table`; an empty list if it does not exist
    async fn describe_table(&self, table: &TableName) -> DbResult<Vec<ColumnDescription>>;
}

/// Runs generated SQL
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Execute one statement, returning affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;
}

/// Re-establishes a warehouse session
#[async_trait]
pub trait Reconnect: Send + Sync {
    async fn reestablish_connection(&self) -> DbResult<()>;
}

/// Bulk-loads rows into a staging table
#[async_trait]
pub trait StagingLoader: Send + Sync {
    /// Load `rows` into `staging`, whose columns are `columns`
    async fn load_rows(&self, staging: &TableName, columns: &Columns, rows: &[Row])
        -> DbResult<usize>;
}

/// Everything a flush needs from a warehouse driver.
pub trait Warehouse: SchemaReader + StatementExecutor + Reconnect + StagingLoader {}

impl<T> Warehouse for T where T: SchemaReader + StatementExecutor + Reconnect + StagingLoader {}
