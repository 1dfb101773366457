//! Typed column descriptors and their ordered collection

use crate::kind::KindDetails;

/// A single column of a table or batch.
///
/// Names keep the case they were created with but are compared
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: KindDetails,
    primary_key: bool,
    backfilled: bool,
}

impl Column {
    /// Create a column that is neither a primary key nor backfilled
    pub fn new(name: impl Into<String>, kind: KindDetails) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_key: false,
            backfilled: false,
        }
    }

    /// Mark the column as part of the primary key
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &KindDetails {
        &self.kind
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Whether the column's default value has been backfilled into
    /// existing rows
    pub fn is_backfilled(&self) -> bool {
        self.backfilled
    }

    pub fn set_backfilled(&mut self, backfilled: bool) {
        self.backfilled = backfilled;
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered collection of columns with case-insensitively unique names.
///
/// Insertion order is preserved so generated SQL is reproducible. Not
/// synchronized: clone before mutating a snapshot shared with others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    columns: Vec<Column>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column unless one with the same name (ignoring case)
    /// already exists. Returns whether the column was added.
    pub fn add_column(&mut self, column: Column) -> bool {
        if self.get_column(column.name()).is_some() {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Replace the kind and flags of an existing column in place, or
    /// append the column if it is new. The existing name's case is kept.
    pub fn upsert_column(&mut self, column: Column) {
        match self.get_column_mut(column.name()) {
            Some(existing) => {
                existing.kind = column.kind;
                existing.primary_key = column.primary_key;
                existing.backfilled = column.backfilled;
            }
            None => self.columns.push(column),
        }
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.matches(name))
    }

    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.matches(name))
    }

    /// Remove a column by name, returning it if present
    pub fn delete_column(&mut self, name: &str) -> Option<Column> {
        let index = self.columns.iter().position(|c| c.matches(name))?;
        Some(self.columns.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}

impl FromIterator<Column> for Columns {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        let mut columns = Columns::new();
        for column in iter {
            columns.add_column(column);
        }
        columns
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Independent copy of `columns`; `None` yields an empty collection.
pub fn clone_columns(columns: Option<&Columns>) -> Columns {
    columns.cloned().unwrap_or_default()
}

#[cfg(test)]
#[path = "columns_test.rs"]
mod tests;
