//! ws-typing - Type model for Warehouse Sync
//!
//! This crate reconciles loosely-typed source values with a warehouse's
//! strict schema: an arbitrary-precision decimal model, the column kind
//! enumeration and its mapping to and from warehouse type strings, ordered
//! column collections, the column diff engine, and the value size guard.

pub mod columns;
pub mod decimal;
pub mod diff;
pub mod guard;
pub mod kind;
pub mod registry;

pub use columns::{clone_columns, Column, Columns};
pub use decimal::Decimal;
pub use diff::{diff, should_skip_column, ColumnDiff, DiffOptions};
pub use guard::{guard_value, ValueGuard};
pub use kind::{parse_numeric, ExtTimeKind, KindDetails};
pub use registry::{kind_from_dwh_type, kind_to_dwh_type};
