//! Merge command implementation

use anyhow::{Context, Result};
use serde::Deserialize;
use ws_core::{Dialect, TableName};
use ws_sql::{merge_statements, parse_statements, MergeArgument, PrimaryKey};

use crate::cli::{GlobalArgs, MergeArgs};
use crate::commands::common::{default_true, read_yaml, to_columns, ColumnSpec};

/// A merge described in YAML.
///
/// ```yaml
/// table: db.public.orders
/// dialect: snowflake
/// sub_query: SELECT * FROM db.public.orders_staging
/// columns:
///   - { name: id, type: "NUMBER(38,0)" }
///   - { name: updated_at, type: TIMESTAMP_TZ }
/// primary_keys: [id]
/// idempotent_key: updated_at
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MergeFile {
    pub table: String,
    #[serde(default)]
    pub dialect: Dialect,
    /// Inline sub-query (Snowflake) or staging table (BigQuery, Redshift)
    pub sub_query: String,
    pub columns: Vec<ColumnSpec>,
    pub primary_keys: Vec<String>,
    #[serde(default = "default_true")]
    pub escape_primary_keys: bool,
    #[serde(default)]
    pub idempotent_key: Option<String>,
    #[serde(default)]
    pub soft_delete: bool,
    /// Extra predicates AND-ed into the join
    #[serde(default)]
    pub additional_equality: Vec<String>,
}

/// Execute the merge command
pub fn execute(args: &MergeArgs, global: &GlobalArgs) -> Result<()> {
    let file: MergeFile = read_yaml(&args.file)?;
    let dialect = args.dialect.unwrap_or(file.dialect);

    let statements = render(&file, dialect)?;
    if args.check {
        let sql = statements.join(";\n");
        let parsed = parse_statements(dialect, &sql)
            .with_context(|| format!("Rendered {} SQL does not parse", dialect))?;
        if global.verbose {
            eprintln!("Parsed {} statement(s) as {}", parsed.len(), dialect);
        }
    }

    for sql in &statements {
        println!("{};", sql);
    }
    Ok(())
}

/// Render the statements for `file` in execution order.
pub(crate) fn render(file: &MergeFile, dialect: Dialect) -> Result<Vec<String>> {
    let table = TableName::try_new(&file.table).context("Merge file has an empty table name")?;
    let columns = to_columns(dialect, &file.columns);
    let primary_keys = file
        .primary_keys
        .iter()
        .map(|k| PrimaryKey::new(k, file.escape_primary_keys))
        .collect();

    let mut arg = MergeArgument::new(table, &file.sub_query, dialect, columns, primary_keys)
        .with_idempotent_key(file.idempotent_key.clone())
        .with_soft_delete(file.soft_delete);
    for predicate in &file.additional_equality {
        arg = arg.with_additional_equality(predicate);
    }

    let statements = merge_statements(&arg)
        .with_context(|| format!("Failed to build merge for {}", file.table))?;
    log::debug!("Rendered {} statement(s) for {}", statements.len(), file.table);
    Ok(statements)
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
