//! BigQuery partition settings and partition-pruning merge predicates

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::quoted_literal_list;
use serde::{Deserialize, Serialize};

/// Partition types the merge predicate knows how to render.
pub const VALID_PARTITION_TYPES: &[&str] = &["time"];

/// Partition granularities the merge predicate knows how to render.
pub const VALID_PARTITION_BY: &[&str] = &["daily"];

/// How a BigQuery destination table is partitioned.
///
/// When present, merges add a predicate restricting the target side to the
/// partitions touched by the flush so BigQuery can prune the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BigQueryPartitionSettings {
    /// Partitioning scheme (`time`)
    pub partition_type: String,
    /// Column the table is partitioned on
    pub partition_field: String,
    /// Partition granularity (`daily`)
    pub partition_by: String,
}

impl BigQueryPartitionSettings {
    /// Validate that every field is set and supported.
    pub fn validate(&self) -> CoreResult<()> {
        if self.partition_type.is_empty() {
            return Err(invalid("partition_type cannot be empty"));
        }
        if self.partition_field.is_empty() {
            return Err(invalid("partition_field cannot be empty"));
        }
        if self.partition_by.is_empty() {
            return Err(invalid("partition_by cannot be empty"));
        }
        if !VALID_PARTITION_TYPES.contains(&self.partition_type.as_str()) {
            return Err(invalid(format!(
                "partition_type must be one of: {}",
                VALID_PARTITION_TYPES.join(", ")
            )));
        }
        if !VALID_PARTITION_BY.contains(&self.partition_by.as_str()) {
            return Err(invalid(format!(
                "partition_by must be one of: {}",
                VALID_PARTITION_BY.join(", ")
            )));
        }
        Ok(())
    }

    /// Render the equality predicate added to the MERGE join condition.
    ///
    /// `values` are the distinct partition values (e.g. `2024-01-01`) present
    /// in the flushed batch.
    pub fn merge_predicate<S: AsRef<str>>(&self, values: &[S]) -> CoreResult<String> {
        self.validate()?;
        if values.is_empty() {
            return Err(invalid("partition values cannot be empty"));
        }

        match (self.partition_type.as_str(), self.partition_by.as_str()) {
            ("time", "daily") => Ok(format!(
                "DATE(c.{}) IN ({})",
                self.partition_field,
                quoted_literal_list(values)
            )),
            (partition_type, partition_by) => Err(invalid(format!(
                "unexpected partition_type: {} and/or partition_by: {}",
                partition_type, partition_by
            ))),
        }
    }
}

fn invalid(message: impl Into<String>) -> CoreError {
    CoreError::InvalidPartition {
        message: message.into(),
    }
}

#[cfg(test)]
#[path = "partition_test.rs"]
mod tests;
