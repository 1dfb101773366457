//! ws-core - Core library for Warehouse Sync
//!
//! This crate provides the shared vocabulary used by every other crate:
//! the destination dialect enumeration and its limits, bookkeeping marker
//! columns, configuration parsing, table names and the metrics seam.

pub mod config;
pub mod dialect;
pub mod error;
pub mod markers;
pub mod metrics;
pub mod partition;
pub mod sql_utils;
pub mod table_name;

pub use config::{Config, TableSettings};
pub use dialect::Dialect;
pub use error::{CoreError, CoreResult};
pub use metrics::{MetricsProvider, NullMetricsProvider, Tags};
pub use partition::BigQueryPartitionSettings;
pub use table_name::TableName;
