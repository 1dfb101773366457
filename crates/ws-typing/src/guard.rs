//! Oversized value replacement
//!
//! Warehouses reject rows whose string or semi-structured values exceed a
//! per-column byte limit. The guard swaps such values for the exceeded
//! marker so the rest of the row still loads.

use crate::columns::Column;
use crate::kind::KindDetails;
use serde_json::{json, Value};
use std::io;
use ws_core::markers::EXCEEDED_VALUE_MARKER;
use ws_core::Dialect;

/// Per-dialect value size guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueGuard {
    max_scalar_bytes: usize,
    max_semi_structured_bytes: usize,
}

impl ValueGuard {
    /// Guard using the dialect's documented limits
    pub fn new(dialect: Dialect) -> Self {
        Self::with_limits(
            dialect.max_scalar_value_bytes(),
            dialect.max_semi_structured_value_bytes(),
        )
    }

    /// Guard with explicit limits
    pub fn with_limits(max_scalar_bytes: usize, max_semi_structured_bytes: usize) -> Self {
        Self {
            max_scalar_bytes,
            max_semi_structured_bytes,
        }
    }

    /// Return `value`, or the exceeded marker if it is too large for `column`.
    ///
    /// String columns get the bare marker; struct columns get
    /// `{"key": <marker>}` so the payload stays an object. Every other
    /// kind passes through untouched.
    pub fn guard(&self, value: Value, column: &Column) -> Value {
        let limit = match column.kind() {
            KindDetails::String => self.max_scalar_bytes,
            KindDetails::Struct => self.max_semi_structured_bytes,
            _ => return value,
        };
        if value.is_null() || encoded_len(&value) <= limit {
            return value;
        }

        log::debug!(
            "Value for column '{}' exceeds {} bytes, replacing with marker",
            column.name(),
            limit
        );
        match column.kind() {
            KindDetails::Struct => json!({ "key": EXCEEDED_VALUE_MARKER }),
            _ => Value::String(EXCEEDED_VALUE_MARKER.to_string()),
        }
    }
}

/// Guard a single value with `dialect`'s limits.
pub fn guard_value(value: Value, column: &Column, dialect: Dialect) -> Value {
    ValueGuard::new(dialect).guard(value, column)
}

/// Byte length of the value's textual form. Strings are measured directly;
/// anything else is measured by streaming its JSON encoding.
fn encoded_len(value: &Value) -> usize {
    if let Value::String(s) = value {
        return s.len();
    }
    let mut counter = ByteCounter::default();
    match serde_json::to_writer(&mut counter, value) {
        Ok(()) => counter.0,
        // Writing to a counter cannot fail; treat any error as oversized.
        Err(_) => usize::MAX,
    }
}

#[derive(Default)]
struct ByteCounter(usize);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
