//! Configuration types and parsing for ws.yml

use crate::dialect::Dialect;
use crate::error::{CoreError, CoreResult};
use crate::partition::BigQueryPartitionSettings;
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main sync configuration from ws.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Destination warehouse dialect
    #[serde(default)]
    pub destination: Dialect,

    /// Mark deleted rows with the delete marker instead of removing them
    #[serde(default)]
    pub soft_delete: bool,

    /// Always write the `__artie_updated_at` marker column
    #[serde(default)]
    pub include_artie_updated_at: bool,

    /// Drop destination columns that no longer exist upstream
    #[serde(default)]
    pub drop_deleted_columns: bool,

    /// Per-table settings
    #[serde(default)]
    pub tables: Vec<TableSettings>,
}

/// Settings for a single destination table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSettings {
    /// Fully qualified destination table name
    pub name: TableName,

    /// Primary key columns, in join order
    pub primary_keys: Vec<String>,

    /// Escape primary key identifiers in generated SQL
    #[serde(default = "escape_primary_keys_default")]
    pub escape_primary_keys: bool,

    /// Column used to reject out-of-order (older) updates
    #[serde(default)]
    pub idempotent_key: Option<String>,

    /// Table-level soft delete override
    #[serde(default)]
    pub soft_delete: Option<bool>,

    /// BigQuery partitioning used to prune merges
    #[serde(default)]
    pub bigquery_partition: Option<BigQueryPartitionSettings>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        log::debug!(
            "Loaded config for {} with {} table(s)",
            config.destination,
            config.tables.len()
        );
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for ws.yml or ws.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("ws.yml");
        let yaml_path = dir.join("ws.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let mut seen = std::collections::HashSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "Table name cannot be empty".to_string(),
                });
            }

            if !seen.insert(table.name.key()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Duplicate table '{}'", table.name),
                });
            }

            if table.primary_keys.is_empty() || table.primary_keys.iter().any(|k| k.is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Table '{}' must declare at least one non-empty primary key",
                        table.name
                    ),
                });
            }

            if let Some(partition) = &table.bigquery_partition {
                if self.destination != Dialect::BigQuery {
                    return Err(CoreError::ConfigInvalid {
                        message: format!(
                            "Table '{}' sets bigquery_partition but the destination is {}",
                            table.name, self.destination
                        ),
                    });
                }
                partition.validate()?;
            }
        }

        Ok(())
    }

    /// Look up table settings by name (case-insensitive)
    pub fn table(&self, name: &str) -> Option<&TableSettings> {
        self.tables
            .iter()
            .find(|t| t.name.matches(name))
    }

    /// Effective soft-delete flag for a table, applying the table override
    pub fn soft_delete_for(&self, name: &str) -> bool {
        self.table(name)
            .and_then(|t| t.soft_delete)
            .unwrap_or(self.soft_delete)
    }
}

fn escape_primary_keys_default() -> bool {
    true
}

impl TableSettings {
    /// The idempotent key, treating an empty string as unset
    pub fn idempotent_key(&self) -> Option<&str> {
        self.idempotent_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
