//! Schema-evolution DDL and classification of DDL race errors

use crate::escape::escape_name;
use std::fmt::Display;
use ws_core::{Dialect, TableName};
use ws_typing::{kind_to_dwh_type, Column, KindDetails};

/// Whether an `ALTER TABLE` adds or drops columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterMode {
    Add,
    Drop,
}

/// One `ALTER TABLE` statement per column.
///
/// Columns whose kind has no warehouse type (`Invalid`) cannot be added
/// and are skipped.
pub fn alter_table_statements<'a>(
    dialect: Dialect,
    table: &TableName,
    columns: impl IntoIterator<Item = &'a Column>,
    mode: AlterMode,
) -> Vec<String> {
    columns
        .into_iter()
        .filter_map(|column| {
            let name = escape_name(column.name(), dialect);
            match mode {
                AlterMode::Drop => Some(format!("ALTER TABLE {table} DROP COLUMN {name}")),
                AlterMode::Add => match kind_to_dwh_type(column.kind(), dialect) {
                    Some(data_type) => {
                        Some(format!("ALTER TABLE {table} ADD COLUMN {name} {data_type}"))
                    }
                    None => {
                        log::warn!(
                            "Skipping column '{}' on {}: kind {} has no {} type",
                            column.name(),
                            table,
                            column.kind(),
                            dialect
                        );
                        None
                    }
                },
            }
        })
        .collect()
}

/// `CREATE TABLE IF NOT EXISTS` for a staging table holding `columns`.
///
/// `Invalid` columns are loaded as strings so staged rows keep every field.
pub fn create_table_statement<'a>(
    dialect: Dialect,
    table: &TableName,
    columns: impl IntoIterator<Item = &'a Column>,
) -> String {
    let definitions: Vec<String> = columns
        .into_iter()
        .map(|column| {
            let data_type = kind_to_dwh_type(column.kind(), dialect)
                .or_else(|| kind_to_dwh_type(&KindDetails::String, dialect))
                .unwrap_or_default();
            format!("{} {}", escape_name(column.name(), dialect), data_type)
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} ({})",
        definitions.join(",")
    )
}

/// `DROP TABLE IF EXISTS`
pub fn drop_table_statement(table: &TableName) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

/// Whether `err` reports that an added column already exists, meaning a
/// concurrent writer (or a previous attempt) already evolved the table.
pub fn is_column_already_exists_error<E: Display + ?Sized>(err: &E, dialect: Dialect) -> bool {
    let message = err.to_string();
    match dialect {
        Dialect::BigQuery => message.contains("Column already exists"),
        Dialect::Snowflake | Dialect::Redshift => {
            let lower = message.to_lowercase();
            lower.contains("column") && lower.contains("already exists")
        }
    }
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
