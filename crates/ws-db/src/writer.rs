//! Flush orchestration for one table's buffered rows
//!
//! A flush reads the table's live columns (cached), adds the columns the
//! batch introduced, optionally drops the ones it no longer carries,
//! guards every value, loads the rows into a staging table and merges.
//! The staging table is dropped before it is created and again on every
//! exit path once the flush has touched it.

use crate::error::{DbError, DbResult};
use crate::table_config::{columns_from_descriptions, TableConfigCache};
use crate::traits::{Row, Warehouse};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use ws_core::markers::DELETE_COLUMN_MARKER;
use ws_core::metrics::tags;
use ws_core::{Config, Dialect, MetricsProvider, NullMetricsProvider, TableName, TableSettings};
use ws_sql::{
    alter_table_statements, create_table_statement, drop_table_statement, escape_name,
    is_column_already_exists_error, merge_statements, AlterMode, MergeArgument, PrimaryKey,
};
use ws_typing::{clone_columns, diff, Column, Columns, DiffOptions, KindDetails, ValueGuard};

/// Suffix of the per-table staging table
const STAGING_SUFFIX: &str = "staging";

/// Rows buffered for one table, ready to flush.
#[derive(Debug, Clone)]
pub struct TableData {
    pub table: TableName,
    /// Columns observed in the batch, in output order
    pub columns: Columns,
    pub rows: Vec<Row>,
    /// Distinct partition dates in the batch, for BigQuery partition pruning
    pub distinct_dates: Vec<String>,
}

impl TableData {
    pub fn new(table: TableName, columns: Columns, rows: Vec<Row>) -> Self {
        Self {
            table,
            columns,
            rows,
            distinct_dates: Vec::new(),
        }
    }
}

/// What a flush did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub rows: usize,
    pub added_columns: Vec<String>,
    pub dropped_columns: Vec<String>,
    /// The merge needed a reconnect and a second attempt
    pub retried: bool,
}

/// Writes flushed batches into a warehouse.
pub struct TableWriter<W> {
    warehouse: W,
    config: Config,
    cache: TableConfigCache,
    metrics: Arc<dyn MetricsProvider>,
}

impl<W: Warehouse> TableWriter<W> {
    pub fn new(warehouse: W, config: Config) -> Self {
        Self {
            warehouse,
            config,
            cache: TableConfigCache::new(),
            metrics: Arc::new(NullMetricsProvider),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsProvider>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn warehouse(&self) -> &W {
        &self.warehouse
    }

    pub fn cache(&self) -> &TableConfigCache {
        &self.cache
    }

    fn dialect(&self) -> Dialect {
        self.config.destination
    }

    /// Flush `data` into its table.
    pub async fn flush(&self, data: &TableData) -> DbResult<FlushSummary> {
        let settings = self
            .config
            .table(data.table.as_str())
            .ok_or_else(|| DbError::TableNotConfigured(data.table.to_string()))?;
        let metric_tags = tags([
            ("table", data.table.as_str()),
            ("dialect", self.dialect().name()),
        ]);
        let started = Instant::now();

        let mut summary = FlushSummary {
            rows: data.rows.len(),
            ..FlushSummary::default()
        };
        if data.rows.is_empty() {
            log::debug!("Nothing to flush for {}", data.table);
            return Ok(summary);
        }

        let target = self.table_columns(&data.table).await?;
        let options = DiffOptions {
            soft_delete: self.config.soft_delete_for(data.table.as_str()),
            include_artie_updated_at: self.config.include_artie_updated_at,
        };
        let delta = diff(Some(&data.columns), Some(&target), options);

        summary.added_columns = self.add_columns(&data.table, &delta.target_missing).await?;
        if self.config.drop_deleted_columns && !delta.source_missing.is_empty() {
            summary.dropped_columns = self
                .drop_columns(&data.table, &delta.source_missing)
                .await?;
        }

        let columns = staging_columns(&data.columns);
        let rows = self.prepare_rows(&columns, &data.rows);
        let staging = data.table.staging(STAGING_SUFFIX);
        let statements =
            self.build_merge(settings, data, &staging, columns.clone(), options.soft_delete)?;

        self.warehouse
            .execute(&drop_table_statement(&staging))
            .await?;
        let merged = self.load_and_merge(&staging, &columns, &rows, &statements).await;
        self.drop_staging(&staging).await;
        summary.retried = merged?;

        self.metrics
            .count("flush.rows", summary.rows as i64, &metric_tags);
        self.metrics
            .timing("flush.duration", started.elapsed(), &metric_tags);
        if summary.retried {
            self.metrics.incr("flush.reconnect", &metric_tags);
        }
        log::info!(
            "Flushed {} row(s) into {} in {:?}",
            summary.rows,
            data.table,
            started.elapsed()
        );
        Ok(summary)
    }

    /// Live columns of `table`, described once and then served from the cache
    async fn table_columns(&self, table: &TableName) -> DbResult<Columns> {
        if let Some(columns) = self.cache.get(table)? {
            return Ok(columns);
        }

        let descriptions = self.warehouse.describe_table(table).await?;
        let columns = columns_from_descriptions(self.dialect(), &descriptions);
        log::debug!("Described {} with {} column(s)", table, columns.len());
        self.cache.insert(table, columns.clone())?;
        Ok(columns)
    }

    async fn add_columns(&self, table: &TableName, missing: &[Column]) -> DbResult<Vec<String>> {
        let mut added = Vec::new();
        for column in missing {
            let statements =
                alter_table_statements(self.dialect(), table, [column], AlterMode::Add);
            let Some(sql) = statements.first() else {
                continue;
            };

            match self.warehouse.execute(sql).await {
                Ok(_) => log::info!("Added column '{}' to {}", column.name(), table),
                Err(e) if is_column_already_exists_error(&e, self.dialect()) => {
                    log::info!(
                        "Column '{}' already exists on {}, continuing",
                        column.name(),
                        table
                    );
                }
                Err(e) => return Err(e),
            }
            self.cache.apply_changes(table, std::slice::from_ref(column), &[])?;
            added.push(column.name().to_string());
        }
        Ok(added)
    }

    async fn drop_columns(&self, table: &TableName, stale: &[Column]) -> DbResult<Vec<String>> {
        let mut dropped = Vec::new();
        for column in stale {
            for sql in alter_table_statements(self.dialect(), table, [column], AlterMode::Drop) {
                self.warehouse.execute(&sql).await?;
            }
            log::info!("Dropped column '{}' from {}", column.name(), table);
            self.cache.apply_changes(table, &[], std::slice::from_ref(column))?;
            dropped.push(column.name().to_string());
        }
        Ok(dropped)
    }

    /// Render decimals, guard oversized values and default a missing delete
    /// marker to `false`.
    fn prepare_rows(&self, columns: &Columns, rows: &[Row]) -> Vec<Row> {
        let guard = ValueGuard::new(self.dialect());
        let marker = columns
            .get_column(DELETE_COLUMN_MARKER)
            .map_or(DELETE_COLUMN_MARKER, Column::name);

        rows.iter()
            .map(|row| {
                let mut prepared = row.clone();
                for column in columns {
                    if let Some(value) = prepared.remove(column.name()) {
                        let value = match column.kind() {
                            KindDetails::EDecimal(decimal) => decimal.stage_value(value),
                            _ => value,
                        };
                        prepared.insert(column.name().to_string(), guard.guard(value, column));
                    }
                }
                prepared
                    .entry(marker)
                    .or_insert(Value::Bool(false));
                prepared
            })
            .collect()
    }

    /// Create and fill the staging table, then run the merge
    async fn load_and_merge(
        &self,
        staging: &TableName,
        columns: &Columns,
        rows: &[Row],
        statements: &[String],
    ) -> DbResult<bool> {
        self.warehouse
            .execute(&create_table_statement(self.dialect(), staging, columns))
            .await?;
        let loaded = self.warehouse.load_rows(staging, columns, rows).await?;
        log::debug!("Loaded {} row(s) into {}", loaded, staging);
        self.execute_with_retry(statements).await
    }

    fn build_merge(
        &self,
        settings: &TableSettings,
        data: &TableData,
        staging: &TableName,
        columns: Columns,
        soft_delete: bool,
    ) -> DbResult<Vec<String>> {
        let dialect = self.dialect();
        let sub_query = if dialect.uses_staging_table() {
            staging.to_string()
        } else {
            let names: Vec<String> = columns
                .iter()
                .map(|c| escape_name(c.name(), dialect))
                .collect();
            format!("SELECT {} FROM {}", names.join(","), staging)
        };

        let primary_keys = settings
            .primary_keys
            .iter()
            .map(|k| PrimaryKey::new(k, settings.escape_primary_keys))
            .collect();

        let mut arg = MergeArgument::new(data.table.clone(), sub_query, dialect, columns, primary_keys)
            .with_idempotent_key(settings.idempotent_key().map(str::to_string))
            .with_soft_delete(soft_delete);

        if let Some(partition) = &settings.bigquery_partition {
            if !data.distinct_dates.is_empty() {
                arg = arg.with_additional_equality(partition.merge_predicate(&data.distinct_dates)?);
            }
        }

        Ok(merge_statements(&arg)?)
    }

    /// Run the merge, reconnecting and retrying exactly once if the session
    /// expired. Returns whether a retry happened.
    async fn execute_with_retry(&self, statements: &[String]) -> DbResult<bool> {
        match self.execute_all(statements).await {
            Ok(()) => Ok(false),
            Err(e) if e.is_authentication_expired() => {
                log::warn!("Authentication expired, reconnecting and retrying merge: {}", e);
                self.warehouse.reestablish_connection().await?;
                self.execute_all(statements).await?;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    async fn execute_all(&self, statements: &[String]) -> DbResult<()> {
        for sql in statements {
            self.warehouse.execute(sql).await?;
        }
        Ok(())
    }

    async fn drop_staging(&self, staging: &TableName) {
        if let Err(e) = self.warehouse.execute(&drop_table_statement(staging)).await {
            log::warn!("Failed to drop staging table {}: {}", staging, e);
        }
    }
}

/// Batch columns plus the delete marker, which every merge shape reads.
fn staging_columns(batch: &Columns) -> Columns {
    let mut columns = clone_columns(Some(batch));
    if columns.get_column(DELETE_COLUMN_MARKER).is_none() {
        columns.add_column(Column::new(DELETE_COLUMN_MARKER, KindDetails::Boolean));
    }
    columns
}

#[cfg(test)]
#[path = "writer_test.rs"]
mod tests;
