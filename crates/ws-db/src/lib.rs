//! ws-db - Warehouse collaborator layer for Warehouse Sync
//!
//! This crate defines the seams to a warehouse driver (schema reader,
//! statement executor, reconnection, staging loader) and the flush
//! orchestration that drives the typing and SQL crates through them:
//! diff, evolve the schema, guard values, stage, merge and retry once on
//! authentication expiry.

pub mod error;
pub mod table_config;
pub mod traits;
pub mod writer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{DbError, DbResult};
pub use table_config::{columns_from_descriptions, TableConfigCache};
pub use traits::{
    ColumnDescription, Reconnect, Row, SchemaReader, StagingLoader, StatementExecutor, Warehouse,
};
pub use writer::{FlushSummary, TableData, TableWriter};
