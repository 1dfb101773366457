//! SQL string helpers shared by statement builders
//!
//! Identifier escaping is dialect-aware and lives in `ws-sql`; the helpers
//! here are dialect-independent.

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render values as a comma-separated list of single-quoted literals.
///
/// # Examples
/// ```
/// use ws_core::sql_utils::quoted_literal_list;
/// assert_eq!(quoted_literal_list(&["a", "it's"]), "'a','it''s'");
/// ```
pub fn quoted_literal_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", escape_sql_string(v.as_ref())))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[path = "sql_utils_test.rs"]
mod tests;
