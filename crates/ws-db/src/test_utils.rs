//! In-memory warehouse that records every call, for tests.

use crate::error::{DbError, DbResult};
use crate::traits::{ColumnDescription, Reconnect, Row, SchemaReader, StagingLoader, StatementExecutor};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use ws_core::{MetricsProvider, TableName, Tags};
use ws_typing::Columns;

/// A scripted failure: the next statement containing `pattern` fails
/// with the driver `message`.
struct Failure {
    pattern: String,
    message: String,
}

/// Warehouse double that records executed SQL and staged rows.
#[derive(Default)]
pub struct RecordingWarehouse {
    schemas: Mutex<HashMap<String, Vec<ColumnDescription>>>,
    executed: Mutex<Vec<String>>,
    staged: Mutex<Vec<(String, Vec<Row>)>>,
    failures: Mutex<VecDeque<Failure>>,
    load_failures: Mutex<VecDeque<String>>,
    describes: AtomicUsize,
    reconnects: AtomicUsize,
}

impl RecordingWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `columns` when `table` is described
    pub fn with_table(self, table: &str, columns: Vec<ColumnDescription>) -> Self {
        lock(&self.schemas).insert(table.to_lowercase(), columns);
        self
    }

    /// Fail the next statement containing `pattern` as a driver would
    /// report `message`
    pub fn fail_next(&self, pattern: &str, message: &str) {
        lock(&self.failures).push_back(Failure {
            pattern: pattern.to_string(),
            message: message.to_string(),
        });
    }

    /// Fail the next staging load with `message`
    pub fn fail_next_load(&self, message: &str) {
        lock(&self.load_failures).push_back(message.to_string());
    }

    /// Every statement executed so far, failed ones included
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }

    /// Rows loaded per staging table, in load order
    pub fn staged(&self) -> Vec<(String, Vec<Row>)> {
        lock(&self.staged).clone()
    }

    pub fn describe_count(&self) -> usize {
        self.describes.load(Ordering::SeqCst)
    }

    pub fn reconnect_count(&self) -> usize {
        self.reconnects.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl SchemaReader for RecordingWarehouse {
    async fn describe_table(&self, table: &TableName) -> DbResult<Vec<ColumnDescription>> {
        self.describes.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.schemas)
            .get(&table.key())
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl StatementExecutor for RecordingWarehouse {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        lock(&self.executed).push(sql.to_string());

        let mut failures = lock(&self.failures);
        if let Some(index) = failures.iter().position(|f| sql.contains(&f.pattern)) {
            if let Some(failure) = failures.remove(index) {
                return Err(DbError::from_driver_message(failure.message));
            }
        }
        Ok(0)
    }
}

#[async_trait]
impl Reconnect for RecordingWarehouse {
    async fn reestablish_connection(&self) -> DbResult<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl StagingLoader for RecordingWarehouse {
    async fn load_rows(&self, staging: &TableName, _columns: &Columns, rows: &[Row]) -> DbResult<usize> {
        if let Some(message) = lock(&self.load_failures).pop_front() {
            return Err(DbError::LoadError(message));
        }
        lock(&self.staged).push((staging.to_string(), rows.to_vec()));
        Ok(rows.len())
    }
}

/// Metrics provider that records metric names.
#[derive(Default)]
pub struct RecordingMetrics {
    names: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn names(&self) -> Vec<String> {
        lock(&self.names).clone()
    }
}

impl MetricsProvider for RecordingMetrics {
    fn gauge(&self, name: &str, _value: f64, _tags: &Tags) {
        lock(&self.names).push(name.to_string());
    }

    fn count(&self, name: &str, _value: i64, _tags: &Tags) {
        lock(&self.names).push(name.to_string());
    }

    fn timing(&self, name: &str, _value: Duration, _tags: &Tags) {
        lock(&self.names).push(name.to_string());
    }
}
