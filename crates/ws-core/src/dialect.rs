//! Destination warehouse dialects

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Largest VARCHAR / VARIANT value Snowflake accepts (16 MiB).
const SNOWFLAKE_MAX_VALUE_BYTES: usize = 16 * 1024 * 1024;

/// BigQuery rejects rows over 10 MiB in streaming and DML loads.
const BIGQUERY_MAX_VALUE_BYTES: usize = 10 * 1024 * 1024;

/// Redshift `VARCHAR(MAX)` is 65535 bytes.
const REDSHIFT_MAX_VARCHAR_BYTES: usize = 65_535;

/// Redshift `SUPER` values are capped at 1 MiB.
const REDSHIFT_MAX_SUPER_BYTES: usize = 1024 * 1024;

/// A destination warehouse and its SQL dialect.
///
/// Every dialect-dependent decision in the workspace (type rendering,
/// identifier escaping, MERGE shape, value limits) dispatches on this
/// closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Dialect {
    /// Snowflake (default)
    #[default]
    Snowflake,
    /// Google BigQuery
    #[cfg_attr(feature = "clap", value(name = "bigquery"))]
    BigQuery,
    /// Amazon Redshift
    Redshift,
}

impl Dialect {
    /// All supported dialects, in a stable order.
    pub const ALL: [Dialect; 3] = [Dialect::Snowflake, Dialect::BigQuery, Dialect::Redshift];

    /// Lowercase identifier used in config files and logs
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Snowflake => "snowflake",
            Dialect::BigQuery => "bigquery",
            Dialect::Redshift => "redshift",
        }
    }

    /// Maximum byte length of a scalar string value.
    pub fn max_scalar_value_bytes(&self) -> usize {
        match self {
            Dialect::Snowflake => SNOWFLAKE_MAX_VALUE_BYTES,
            Dialect::BigQuery => BIGQUERY_MAX_VALUE_BYTES,
            Dialect::Redshift => REDSHIFT_MAX_VARCHAR_BYTES,
        }
    }

    /// Maximum byte length of a semi-structured (VARIANT / JSON / SUPER) value.
    pub fn max_semi_structured_value_bytes(&self) -> usize {
        match self {
            Dialect::Snowflake => SNOWFLAKE_MAX_VALUE_BYTES,
            Dialect::BigQuery => BIGQUERY_MAX_VALUE_BYTES,
            Dialect::Redshift => REDSHIFT_MAX_SUPER_BYTES,
        }
    }

    /// Whether the dialect loads through a named staging table rather than
    /// an inline sub-query.
    pub fn uses_staging_table(&self) -> bool {
        matches!(self, Dialect::BigQuery | Dialect::Redshift)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowflake" => Ok(Dialect::Snowflake),
            "bigquery" => Ok(Dialect::BigQuery),
            "redshift" => Ok(Dialect::Redshift),
            _ => Err(CoreError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
