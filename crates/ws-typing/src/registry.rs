//! Mapping between warehouse type strings and [`KindDetails`]

use crate::decimal::Decimal;
use crate::kind::{parse_numeric, ExtTimeKind, KindDetails};
use ws_core::Dialect;

/// Redshift has no unbounded text type; `VARCHAR(MAX)` is 65535 bytes.
const REDSHIFT_STRING_TYPE: &str = "varchar(65535)";

/// Parse a warehouse-reported column type (e.g. `NUMBER(38,2)`,
/// `character varying(256)`, `ARRAY<STRING>`) into a kind.
///
/// Matching is case-insensitive. Unknown types map to
/// [`KindDetails::Invalid`].
pub fn kind_from_dwh_type(dialect: Dialect, raw: &str) -> KindDetails {
    let normalized = raw.trim().to_lowercase();
    let base = normalized
        .split(['(', '<'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "number" | "numeric" | "decimal" | "bignumeric" | "bigdecimal" => {
            numeric_kind(dialect, base, &normalized)
        }
        "int" | "integer" | "int2" | "int4" | "int8" | "int64" | "bigint" | "smallint"
        | "tinyint" | "byteint" => KindDetails::Integer,
        "float" | "float4" | "float8" | "float64" | "double" | "double precision" | "real" => {
            KindDetails::Float
        }
        "bool" | "boolean" => KindDetails::Boolean,
        "varchar" | "char" | "character" | "character varying" | "nvarchar" | "nchar"
        | "text" | "string" | "bpchar" => KindDetails::String,
        "variant" | "object" | "json" | "super" | "struct" | "record" => KindDetails::Struct,
        "array" => KindDetails::Array,
        _ => time_kind(base).unwrap_or_else(|| {
            log::debug!("Unmapped {} column type '{}'", dialect, raw);
            KindDetails::Invalid
        }),
    }
}

/// Render a kind as a column type for `ALTER TABLE ... ADD COLUMN`.
///
/// Returns `None` for [`KindDetails::Invalid`], which has no rendering.
pub fn kind_to_dwh_type(kind: &KindDetails, dialect: Dialect) -> Option<String> {
    let rendered = match (dialect, kind) {
        (_, KindDetails::Invalid) => return None,
        (_, KindDetails::EDecimal(decimal)) => decimal.kind(dialect),

        (Dialect::Snowflake, KindDetails::Integer) => "int".to_string(),
        (Dialect::Snowflake, KindDetails::Float) => "float".to_string(),
        (Dialect::Snowflake, KindDetails::Boolean) => "boolean".to_string(),
        (Dialect::Snowflake, KindDetails::String) => "string".to_string(),
        (Dialect::Snowflake, KindDetails::Struct) => "variant".to_string(),
        (Dialect::Snowflake, KindDetails::Array) => "array".to_string(),
        (Dialect::Snowflake, KindDetails::ETime(ExtTimeKind::DateTime)) => {
            "timestamp_tz".to_string()
        }

        (Dialect::BigQuery, KindDetails::Integer) => "int64".to_string(),
        (Dialect::BigQuery, KindDetails::Float) => "float64".to_string(),
        (Dialect::BigQuery, KindDetails::Boolean) => "bool".to_string(),
        (Dialect::BigQuery, KindDetails::String) => "string".to_string(),
        (Dialect::BigQuery, KindDetails::Struct) => "json".to_string(),
        (Dialect::BigQuery, KindDetails::Array) => "array<string>".to_string(),
        (Dialect::BigQuery, KindDetails::ETime(ExtTimeKind::DateTime)) => "timestamp".to_string(),

        (Dialect::Redshift, KindDetails::Integer) => "bigint".to_string(),
        (Dialect::Redshift, KindDetails::Float) => "double precision".to_string(),
        (Dialect::Redshift, KindDetails::Boolean) => "boolean".to_string(),
        (Dialect::Redshift, KindDetails::String) => REDSHIFT_STRING_TYPE.to_string(),
        (Dialect::Redshift, KindDetails::Struct | KindDetails::Array) => "super".to_string(),
        (Dialect::Redshift, KindDetails::ETime(ExtTimeKind::DateTime)) => {
            "timestamp with time zone".to_string()
        }

        (_, KindDetails::ETime(ExtTimeKind::Date)) => "date".to_string(),
        (_, KindDetails::ETime(ExtTimeKind::Time)) => "time".to_string(),
    };
    Some(rendered)
}

fn numeric_kind(dialect: Dialect, base: &str, normalized: &str) -> KindDetails {
    if normalized.contains('(') {
        let compact: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();
        return parse_numeric(base, &compact);
    }

    // A bare numeric means different things per warehouse.
    match (dialect, base) {
        (Dialect::BigQuery, "numeric" | "decimal") => {
            KindDetails::EDecimal(Decimal::new(9, Some(38)))
        }
        (Dialect::BigQuery, "bignumeric" | "bigdecimal") => {
            KindDetails::EDecimal(Decimal::new(38, Some(76)))
        }
        _ => KindDetails::Integer,
    }
}

fn time_kind(base: &str) -> Option<KindDetails> {
    let sub = if base.starts_with("timestamp") || base.starts_with("datetime") {
        ExtTimeKind::DateTime
    } else if base == "date" {
        ExtTimeKind::Date
    } else if base.starts_with("time") {
        ExtTimeKind::Time
    } else {
        return None;
    };
    Some(KindDetails::ETime(sub))
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
