//! Column kind enumeration and numeric type parsing

use crate::decimal::Decimal;
use std::fmt;

/// Time-like subkinds carried by [`KindDetails::ETime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtTimeKind {
    /// Timestamp with time zone
    DateTime,
    /// Calendar date
    Date,
    /// Time of day
    Time,
}

impl ExtTimeKind {
    /// Lowercase subkind name
    pub fn name(&self) -> &'static str {
        match self {
            ExtTimeKind::DateTime => "datetime",
            ExtTimeKind::Date => "date",
            ExtTimeKind::Time => "time",
        }
    }
}

/// Internal type of a column, independent of any warehouse.
///
/// Only `EDecimal` carries a [`Decimal`] descriptor, so "decimal kind
/// without a descriptor" is not representable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KindDetails {
    /// Unknown or unparseable type; handled as generic text by callers
    #[default]
    Invalid,
    Integer,
    Float,
    EDecimal(Decimal),
    Boolean,
    String,
    /// Semi-structured object (JSON, VARIANT, SUPER)
    Struct,
    Array,
    ETime(ExtTimeKind),
}

impl KindDetails {
    /// The decimal descriptor, present only for `EDecimal`
    pub fn decimal(&self) -> Option<&Decimal> {
        match self {
            KindDetails::EDecimal(decimal) => Some(decimal),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, KindDetails::Invalid)
    }

    /// Lowercase kind name used in logs and CLI output
    pub fn name(&self) -> &'static str {
        match self {
            KindDetails::Invalid => "invalid",
            KindDetails::Integer => "int",
            KindDetails::Float => "float",
            KindDetails::EDecimal(_) => "decimal",
            KindDetails::Boolean => "bool",
            KindDetails::String => "string",
            KindDetails::Struct => "struct",
            KindDetails::Array => "array",
            KindDetails::ETime(_) => "extended_time",
        }
    }
}

impl fmt::Display for KindDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindDetails::EDecimal(decimal) => match decimal.precision() {
                Some(p) => write!(f, "decimal({}, {})", p, decimal.scale()),
                None => write!(f, "decimal(*, {})", decimal.scale()),
            },
            KindDetails::ETime(sub) => write!(f, "{}({})", self.name(), sub.name()),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse a warehouse numeric type such as `numeric(10, 2)`.
///
/// `text` must start with `prefix` followed by `(precision)` or
/// `(precision, scale)`. A precision-only type or a zero scale yields
/// [`KindDetails::Integer`]. Precision or scale beyond the 32-bit range is
/// clamped, so oversized declarations still map to a string-backed decimal.
/// Anything malformed yields [`KindDetails::Invalid`]; this never fails hard.
pub fn parse_numeric(prefix: &str, text: &str) -> KindDetails {
    let Some(rest) = text.strip_prefix(prefix) else {
        return KindDetails::Invalid;
    };
    let Some(inner) = rest
        .trim_start()
        .strip_prefix('(')
        .and_then(|r| r.trim_end().strip_suffix(')'))
    else {
        return KindDetails::Invalid;
    };

    let mut parts = Vec::with_capacity(2);
    for part in inner.split(',') {
        match part.trim().parse::<i64>() {
            Ok(n) => parts.push(n),
            Err(_) => return KindDetails::Invalid,
        }
    }

    match parts.as_slice() {
        [_] | [_, 0] => KindDetails::Integer,
        [_, scale] if *scale < 0 => KindDetails::Invalid,
        [precision, scale] => {
            let precision = i32::try_from(*precision).unwrap_or(i32::MAX);
            let scale = u32::try_from(*scale).unwrap_or(u32::MAX);
            KindDetails::EDecimal(Decimal::new(scale, Some(precision)))
        }
        _ => KindDetails::Invalid,
    }
}

#[cfg(test)]
#[path = "kind_test.rs"]
mod tests;
