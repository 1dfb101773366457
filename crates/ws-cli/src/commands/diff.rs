//! Diff command implementation

use anyhow::{Context, Result};
use serde::Deserialize;
use ws_core::{Dialect, TableName};
use ws_sql::{alter_table_statements, AlterMode};
use ws_typing::{diff, DiffOptions};

use crate::cli::{DiffArgs, GlobalArgs};
use crate::commands::common::{read_yaml, to_columns, ColumnSpec};

/// Source and target column sets for one table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DiffFile {
    pub table: String,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub soft_delete: bool,
    #[serde(default)]
    pub include_artie_updated_at: bool,
    /// Columns the source currently emits
    pub source: Vec<ColumnSpec>,
    /// Columns the destination table currently has
    #[serde(default)]
    pub target: Vec<ColumnSpec>,
}

/// DDL derived from a diff.
#[derive(Debug, Default)]
pub(crate) struct DiffPlan {
    pub statements: Vec<String>,
    /// Target columns the source no longer has and that were not dropped
    pub kept: Vec<String>,
}

/// Execute the diff command
pub fn execute(args: &DiffArgs, global: &GlobalArgs) -> Result<()> {
    let file: DiffFile = read_yaml(&args.file)?;
    let dialect = args.dialect.unwrap_or(file.dialect);
    let plan = plan(&file, dialect, args.drop)?;

    if plan.statements.is_empty() {
        println!("-- {} is up to date", file.table);
    }
    for sql in &plan.statements {
        println!("{};", sql);
    }
    if !plan.kept.is_empty() {
        println!(
            "-- not in source (pass --drop to remove): {}",
            plan.kept.join(", ")
        );
    }
    if global.verbose {
        eprintln!("{} statement(s) for {}", plan.statements.len(), file.table);
    }
    Ok(())
}

pub(crate) fn plan(file: &DiffFile, dialect: Dialect, drop: bool) -> Result<DiffPlan> {
    let table = TableName::try_new(&file.table).context("Diff file has an empty table name")?;
    let source = to_columns(dialect, &file.source);
    let target = to_columns(dialect, &file.target);
    let options = DiffOptions {
        soft_delete: file.soft_delete,
        include_artie_updated_at: file.include_artie_updated_at,
    };
    let delta = diff(Some(&source), Some(&target), options);

    let mut plan = DiffPlan {
        statements: alter_table_statements(dialect, &table, &delta.target_missing, AlterMode::Add),
        ..DiffPlan::default()
    };
    if drop {
        plan.statements.extend(alter_table_statements(
            dialect,
            &table,
            &delta.source_missing,
            AlterMode::Drop,
        ));
    } else {
        plan.kept = delta
            .source_missing
            .iter()
            .map(|c| c.name().to_string())
            .collect();
    }
    Ok(plan)
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
