//! Parse-back check for generated statements

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::{BigQueryDialect, RedshiftSqlDialect, SnowflakeDialect};
use sqlparser::parser::Parser;
use ws_core::Dialect;

/// Parse `sql` with the warehouse's grammar.
///
/// Used to sanity check synthesized statements before they are handed to
/// a driver; the warehouse remains the authority on what it accepts.
pub fn parse_statements(dialect: Dialect, sql: &str) -> SqlResult<Vec<Statement>> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlError::EmptySql);
    }

    let parsed = match dialect {
        Dialect::Snowflake => Parser::parse_sql(&SnowflakeDialect {}, sql),
        Dialect::BigQuery => Parser::parse_sql(&BigQueryDialect {}, sql),
        Dialect::Redshift => Parser::parse_sql(&RedshiftSqlDialect {}, sql),
    };

    parsed.map_err(|e| {
        let message = e.to_string();
        let (line, column) = parse_location_from_error(&message);
        SqlError::ParseError {
            message,
            line,
            column,
        }
    })
}

/// Extract "Line: N, Column: M" from a sqlparser error message.
///
/// `ParserError` carries no structured location, only text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = msg.find(label)? + label.len();
        let rest = &msg[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        rest[..end].parse().ok()
    };

    match (number_after("Line: "), number_after("Column: ")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
