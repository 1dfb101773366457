//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use ws_core::Dialect;
use ws_typing::{kind_from_dwh_type, Column, Columns};

/// A column as written in a command file: a name and a warehouse type.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Read and deserialize a YAML command file
pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Type each spec with `dialect`'s registry, keeping file order.
pub(crate) fn to_columns(dialect: Dialect, specs: &[ColumnSpec]) -> Columns {
    let mut columns = Columns::new();
    for spec in specs {
        let column = Column::new(&spec.name, kind_from_dwh_type(dialect, &spec.data_type));
        if column.kind().is_invalid() {
            log::warn!(
                "Column '{}' has unrecognized {} type '{}'",
                spec.name,
                dialect,
                spec.data_type
            );
        }
        if !columns.add_column(column) {
            log::warn!("Ignoring duplicate column '{}'", spec.name);
        }
    }
    columns
}

pub(crate) fn default_true() -> bool {
    true
}
