//! Identifier escaping per dialect

use ws_core::Dialect;

/// Keywords reserved by every supported warehouse.
const RESERVED: &[&str] = &[
    "all", "alter", "and", "any", "as", "asc", "between", "by", "case", "cast", "check",
    "column", "connect", "constraint", "create", "cross", "current", "current_date",
    "current_time", "current_timestamp", "current_user", "default", "delete", "desc",
    "distinct", "drop", "else", "end", "except", "exists", "false", "following", "for",
    "from", "full", "grant", "group", "having", "ilike", "in", "increment", "inner",
    "insert", "intersect", "interval", "into", "is", "join", "lateral", "left", "like",
    "limit", "localtime", "localtimestamp", "minus", "natural", "not", "null", "of",
    "offset", "on", "or", "order", "qualify", "regexp", "revoke", "right", "rlike", "row",
    "rows", "sample", "select", "set", "some", "start", "table", "tablesample", "then",
    "to", "trigger", "true", "try_cast", "union", "unique", "update", "user", "using",
    "values", "view", "when", "whenever", "where", "window", "with",
];

/// Additional BigQuery reserved keywords.
const BIGQUERY_RESERVED: &[&str] = &[
    "array", "assert_rows_modified", "at", "collate", "contains", "cube", "define",
    "enum", "escape", "exclude", "extract", "fetch", "groups", "grouping", "hash",
    "ignore", "lookup", "merge", "new", "no", "nulls", "outer", "over", "partition",
    "preceding", "proto", "range", "recursive", "respect", "rollup", "struct", "treat",
    "unbounded", "within",
];

/// Additional Redshift reserved keywords.
const REDSHIFT_RESERVED: &[&str] = &[
    "authorization", "backup", "binary", "blanksasnull", "bytedict", "delta", "disable",
    "encode", "encrypt", "freeze", "globaldict256", "identity", "initially", "isnull",
    "notnull", "off", "offline", "oid", "old", "only", "open", "outer", "overlaps",
    "parallel", "partition", "percent", "permissions", "placing", "primary", "raw",
    "readratio", "recover", "references", "respect", "restrict", "snapshot", "system",
    "tag", "tdes", "timestamp", "top", "verbose", "wallet",
];

fn is_reserved(lower: &str, dialect: Dialect) -> bool {
    let extra: &[&str] = match dialect {
        Dialect::Snowflake => &[],
        Dialect::BigQuery => BIGQUERY_RESERVED,
        Dialect::Redshift => REDSHIFT_RESERVED,
    };
    RESERVED.contains(&lower) || extra.contains(&lower)
}

/// Whether `name` must be quoted to be used as an identifier.
///
/// True for reserved words, names starting with a digit, and names with any
/// character outside `[a-z0-9_]` (uppercase included, since unquoted
/// identifiers are case-folded).
pub fn needs_escaping(name: &str, dialect: Dialect) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return true;
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return true;
    }
    is_reserved(name, dialect)
}

/// Quote `name` for `dialect` if needed.
///
/// BigQuery quotes with backticks, the others with double quotes; an
/// embedded quote character is doubled.
pub fn escape_name(name: &str, dialect: Dialect) -> String {
    if !needs_escaping(name, dialect) {
        return name.to_string();
    }

    let quote = match dialect {
        Dialect::BigQuery => '`',
        Dialect::Snowflake | Dialect::Redshift => '"',
    };
    let doubled = quote.to_string().repeat(2);
    format!("{quote}{}{quote}", name.replace(quote, &doubled))
}

#[cfg(test)]
#[path = "escape_test.rs"]
mod tests;
