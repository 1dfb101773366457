//! MERGE statement synthesis
//!
//! One flush of one table becomes either a single `MERGE` (Snowflake
//! against an inline sub-query, BigQuery against a temp table) or, for
//! Redshift, a staged `DELETE` / `UPDATE` / `INSERT` sequence. All shapes
//! share the same join, update and insert fragment builders.

use crate::error::{SqlError, SqlResult};
use crate::escape::escape_name;
use ws_core::markers::DELETE_COLUMN_MARKER;
use ws_core::{Dialect, TableName};
use ws_typing::{Column, Columns, KindDetails};

/// Alias of the destination table in generated statements
const TARGET_ALIAS: &str = "c";

/// Alias of the staged rows in generated statements
const SOURCE_ALIAS: &str = "cc";

/// A primary key column and whether to escape its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub name: String,
    pub escape: bool,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, escape: bool) -> Self {
        Self {
            name: name.into(),
            escape,
        }
    }

    fn render(&self, dialect: Dialect) -> String {
        if self.escape {
            escape_name(&self.name, dialect)
        } else {
            self.name.clone()
        }
    }
}

/// Everything needed to build the load statement for one flush.
#[derive(Debug, Clone)]
pub struct MergeArgument {
    /// Fully qualified destination table
    pub table: TableName,
    /// Inline sub-query (Snowflake) or staging table name (BigQuery, Redshift)
    pub sub_query: String,
    pub dialect: Dialect,
    /// Columns to write, in output order
    pub columns: Columns,
    /// Join keys, in join order
    pub primary_keys: Vec<PrimaryKey>,
    /// Rejects staged rows older than the stored row; empty means unset
    pub idempotent_key: Option<String>,
    pub soft_delete: bool,
    /// Extra predicates AND-ed into the join, e.g. partition pruning
    pub additional_equality_strings: Vec<String>,
}

impl MergeArgument {
    /// Argument with no idempotent key, hard deletes and no extra predicates
    pub fn new(
        table: TableName,
        sub_query: impl Into<String>,
        dialect: Dialect,
        columns: Columns,
        primary_keys: Vec<PrimaryKey>,
    ) -> Self {
        Self {
            table,
            sub_query: sub_query.into(),
            dialect,
            columns,
            primary_keys,
            idempotent_key: None,
            soft_delete: false,
            additional_equality_strings: Vec::new(),
        }
    }

    pub fn with_idempotent_key(mut self, key: Option<String>) -> Self {
        self.idempotent_key = key;
        self
    }

    pub fn with_soft_delete(mut self, soft_delete: bool) -> Self {
        self.soft_delete = soft_delete;
        self
    }

    pub fn with_additional_equality(mut self, predicate: impl Into<String>) -> Self {
        self.additional_equality_strings.push(predicate.into());
        self
    }

    fn validate(&self) -> SqlResult<()> {
        let table = self.table.to_string();
        if table.trim().is_empty() {
            return Err(SqlError::EmptyTableName);
        }
        if self.primary_keys.is_empty() || self.primary_keys.iter().any(|k| k.name.is_empty()) {
            return Err(SqlError::NoPrimaryKeys { table });
        }
        if self.sub_query.trim().is_empty() {
            return Err(SqlError::EmptySubQuery { table });
        }
        if self.columns.is_empty() {
            return Err(SqlError::NoColumns { table });
        }
        // Every shape reads cc.<delete marker> in its match conditions.
        if self.columns.get_column(DELETE_COLUMN_MARKER).is_none() {
            return Err(SqlError::MissingDeleteMarker {
                table,
                marker: DELETE_COLUMN_MARKER,
            });
        }
        Ok(())
    }
}

/// Statement shape for a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergeShape {
    /// `MERGE ... USING (<sub-query>) AS cc`
    Inline,
    /// `MERGE ... USING <temp table> AS cc`
    TempTable,
    /// `DELETE ... USING`, `UPDATE ... FROM`, `INSERT ... SELECT`
    Staged,
}

impl MergeShape {
    fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Snowflake => MergeShape::Inline,
            Dialect::BigQuery => MergeShape::TempTable,
            Dialect::Redshift => MergeShape::Staged,
        }
    }
}

/// Fragment builders over a validated argument.
struct Fragments<'a> {
    arg: &'a MergeArgument,
    written: Vec<String>,
    idempotent_key: Option<String>,
}

impl<'a> Fragments<'a> {
    fn new(arg: &'a MergeArgument) -> SqlResult<Self> {
        let written: Vec<String> = arg
            .columns
            .iter()
            .filter(|c| is_written(c, arg.soft_delete))
            .map(|c| escape_name(c.name(), arg.dialect))
            .collect();
        if written.is_empty() {
            return Err(SqlError::NoColumns {
                table: arg.table.to_string(),
            });
        }

        let idempotent_key = arg
            .idempotent_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| escape_name(k, arg.dialect));

        Ok(Self {
            arg,
            written,
            idempotent_key,
        })
    }

    /// `t.k1 = s.k1 AND t.k2 = s.k2 [AND extra...]`
    fn join(&self, target: &str, source: &str) -> String {
        let keys = self.arg.primary_keys.iter().map(|pk| {
            let name = pk.render(self.arg.dialect);
            let kind = self
                .arg
                .columns
                .get_column(&pk.name)
                .map(Column::kind)
                .unwrap_or(&KindDetails::Invalid);

            match (kind, self.arg.dialect) {
                (KindDetails::Struct, Dialect::BigQuery) => format!(
                    "TO_JSON_STRING({target}.{name}) = TO_JSON_STRING({source}.{name})"
                ),
                (KindDetails::Struct, Dialect::Redshift) => format!(
                    "JSON_SERIALIZE({target}.{name}) = JSON_SERIALIZE({source}.{name})"
                ),
                _ => format!("{target}.{name} = {source}.{name}"),
            }
        });

        keys.chain(self.arg.additional_equality_strings.iter().cloned())
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// ` AND cc.k >= t.k`, or nothing when no idempotent key is set
    fn idempotency(&self, target: &str) -> String {
        match &self.idempotent_key {
            Some(key) => format!(" AND {SOURCE_ALIAS}.{key} >= {target}.{key}"),
            None => String::new(),
        }
    }

    /// `a=cc.a,b=cc.b`
    fn set_clause(&self) -> String {
        self.written
            .iter()
            .map(|c| format!("{c}={SOURCE_ALIAS}.{c}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `a,b`
    fn insert_columns(&self) -> String {
        self.written.join(",")
    }

    /// `cc.a,cc.b`
    fn insert_values(&self) -> String {
        self.written
            .iter()
            .map(|c| format!("{SOURCE_ALIAS}.{c}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn merge(&self, shape: MergeShape) -> String {
        let table = &self.arg.table;
        let source = match shape {
            MergeShape::Inline => format!("({})", self.arg.sub_query),
            _ => self.arg.sub_query.clone(),
        };
        let join = self.join(TARGET_ALIAS, SOURCE_ALIAS);
        let idem = self.idempotency(TARGET_ALIAS);
        let marker = DELETE_COLUMN_MARKER;
        let not_deleted = format!("COALESCE({SOURCE_ALIAS}.{marker}, false) = false");

        let mut sql = format!("MERGE INTO {table} {TARGET_ALIAS} USING {source} AS {SOURCE_ALIAS} ON {join}");
        if self.arg.soft_delete {
            sql.push_str(&format!(
                "\nWHEN MATCHED AND {SOURCE_ALIAS}.{marker}{idem} THEN UPDATE SET {marker}={SOURCE_ALIAS}.{marker}"
            ));
            sql.push_str(&format!(
                "\nWHEN MATCHED AND {not_deleted}{idem} THEN UPDATE SET {}",
                self.set_clause()
            ));
            sql.push_str(&format!(
                "\nWHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
                self.insert_columns(),
                self.insert_values()
            ));
        } else {
            sql.push_str(&format!(
                "\nWHEN MATCHED AND {SOURCE_ALIAS}.{marker}{idem} THEN DELETE"
            ));
            sql.push_str(&format!(
                "\nWHEN MATCHED AND {not_deleted}{idem} THEN UPDATE SET {}",
                self.set_clause()
            ));
            sql.push_str(&format!(
                "\nWHEN NOT MATCHED AND {not_deleted} THEN INSERT ({}) VALUES ({})",
                self.insert_columns(),
                self.insert_values()
            ));
        }
        sql
    }

    fn staged(&self) -> Vec<String> {
        let table = &self.arg.table;
        let staging = &self.arg.sub_query;
        let marker = DELETE_COLUMN_MARKER;
        let not_deleted = format!("COALESCE({SOURCE_ALIAS}.{marker}, false) = false");
        let join = self.join(TARGET_ALIAS, SOURCE_ALIAS);
        let idem = self.idempotency(TARGET_ALIAS);

        let mut statements = Vec::with_capacity(3);
        if self.arg.soft_delete {
            statements.push(format!(
                "UPDATE {table} AS {TARGET_ALIAS} SET {marker}={SOURCE_ALIAS}.{marker} \
                 FROM {staging} AS {SOURCE_ALIAS} WHERE {join} AND {SOURCE_ALIAS}.{marker}{idem}"
            ));
        } else {
            // DELETE cannot alias its target, so qualify with the table name.
            let target = table.as_str();
            statements.push(format!(
                "DELETE FROM {table} USING {staging} AS {SOURCE_ALIAS} WHERE {} AND {SOURCE_ALIAS}.{marker}{}",
                self.join(target, SOURCE_ALIAS),
                self.idempotency(target)
            ));
        }

        statements.push(format!(
            "UPDATE {table} AS {TARGET_ALIAS} SET {} FROM {staging} AS {SOURCE_ALIAS} WHERE {join} AND {not_deleted}{idem}",
            self.set_clause()
        ));

        let first_key = self.arg.primary_keys[0].render(self.arg.dialect);
        let mut insert = format!(
            "INSERT INTO {table} ({}) SELECT {} FROM {staging} AS {SOURCE_ALIAS} \
             LEFT JOIN {table} AS {TARGET_ALIAS} ON {join} WHERE {TARGET_ALIAS}.{first_key} IS NULL",
            self.insert_columns(),
            self.insert_values()
        );
        if !self.arg.soft_delete {
            insert.push_str(&format!(" AND {not_deleted}"));
        }
        statements.push(insert);
        statements
    }
}

/// Columns written by the load: never `Invalid` kinds, and the delete
/// marker only when deletes are soft.
fn is_written(column: &Column, soft_delete: bool) -> bool {
    if column.kind().is_invalid() {
        return false;
    }
    soft_delete || !column.matches(DELETE_COLUMN_MARKER)
}

/// Build the statements that load `arg` into its table, in execution order.
///
/// Snowflake and BigQuery produce one `MERGE`; Redshift produces a staged
/// `DELETE` (or soft-delete `UPDATE`), `UPDATE` and `INSERT`.
pub fn merge_statements(arg: &MergeArgument) -> SqlResult<Vec<String>> {
    arg.validate()?;
    let fragments = Fragments::new(arg)?;
    let shape = MergeShape::for_dialect(arg.dialect);

    let statements = match shape {
        MergeShape::Inline | MergeShape::TempTable => vec![fragments.merge(shape)],
        MergeShape::Staged => fragments.staged(),
    };
    log::debug!(
        "Built {} {:?} statement(s) for {}",
        statements.len(),
        shape,
        arg.table
    );
    Ok(statements)
}

/// Build the load SQL for `arg` as one text, statements separated by `;`.
pub fn merge_statement(arg: &MergeArgument) -> SqlResult<String> {
    Ok(merge_statements(arg)?.join(";\n"))
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
