//! ws-sql - SQL synthesis for Warehouse Sync
//!
//! This crate builds the dialect-specific statements that load a batch into
//! a warehouse table: identifier escaping, the MERGE synthesizer (and the
//! staged multi-statement variant for warehouses without a conditional
//! MERGE), schema-evolution DDL and the classification of DDL race errors.

pub mod ddl;
pub mod error;
pub mod escape;
pub mod merge;
pub mod parser;

pub use ddl::{
    alter_table_statements, create_table_statement, drop_table_statement,
    is_column_already_exists_error, AlterMode,
};
pub use error::{SqlError, SqlResult};
pub use escape::{escape_name, needs_escaping};
pub use merge::{merge_statement, merge_statements, MergeArgument, PrimaryKey};
pub use parser::parse_statements;
