//! Error types for ws-sql

use thiserror::Error;

/// Statement synthesis and parsing errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// SQL parse error (S001)
    #[error("[S001] SQL parse error at line {line}, column {column}: {message}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    /// Empty SQL (S002)
    #[error("[S002] SQL is empty")]
    EmptySql,

    /// Merge without primary keys (S003)
    #[error("[S003] Merge into '{table}' requires at least one non-empty primary key")]
    NoPrimaryKeys { table: String },

    /// Merge without columns to write (S004)
    #[error("[S004] Merge into '{table}' has no columns to write")]
    NoColumns { table: String },

    /// Merge without a staged source (S005)
    #[error("[S005] Merge into '{table}' has an empty sub-query or staging reference")]
    EmptySubQuery { table: String },

    /// Merge target has no name (S006)
    #[error("[S006] Merge target table name is empty")]
    EmptyTableName,

    /// Merge source lacks the delete marker its conditions read (S007)
    #[error("[S007] Merge into '{table}' needs a '{marker}' column in its source")]
    MissingDeleteMarker { table: String, marker: &'static str },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
