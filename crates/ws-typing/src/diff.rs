//! Column diff engine
//!
//! Compares the columns observed in a batch (source) with the columns the
//! warehouse reports (target) and yields what each side is missing.

use crate::columns::{Column, Columns};
use std::collections::HashSet;
use ws_core::markers::{is_marker_column, DELETE_COLUMN_MARKER, UPDATE_COLUMN_MARKER};

/// Which bookkeeping columns the caller manages itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// The delete marker is expected to exist going forward
    pub soft_delete: bool,
    /// The updated-at marker is always written
    pub include_artie_updated_at: bool,
}

/// Columns each side lacks, sorted by name (case-insensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnDiff {
    /// Present in the target but absent from the source
    pub source_missing: Vec<Column>,
    /// Present in the source but absent from the target
    pub target_missing: Vec<Column>,
}

impl ColumnDiff {
    pub fn is_empty(&self) -> bool {
        self.source_missing.is_empty() && self.target_missing.is_empty()
    }
}

struct MarkerRule {
    name: &'static str,
    excluded: fn(&DiffOptions) -> bool,
}

fn soft_delete_enabled(options: &DiffOptions) -> bool {
    options.soft_delete
}

fn updated_at_included(options: &DiffOptions) -> bool {
    options.include_artie_updated_at
}

/// Marker columns and when they are left out of a diff. New markers go here.
const MARKER_RULES: &[MarkerRule] = &[
    MarkerRule {
        name: DELETE_COLUMN_MARKER,
        excluded: soft_delete_enabled,
    },
    MarkerRule {
        name: UPDATE_COLUMN_MARKER,
        excluded: updated_at_included,
    },
];

/// Whether `name` is a marker column excluded from diffs under `options`.
pub fn should_skip_column(name: &str, options: &DiffOptions) -> bool {
    if !is_marker_column(name) {
        return false;
    }
    MARKER_RULES
        .iter()
        .any(|rule| rule.name.eq_ignore_ascii_case(name) && (rule.excluded)(options))
}

/// Diff `source` against `target`. `None` is treated as empty.
///
/// Names are matched case-insensitively. Output is sorted so that
/// logically equal inputs always yield identical results regardless of
/// insertion order.
pub fn diff(source: Option<&Columns>, target: Option<&Columns>, options: DiffOptions) -> ColumnDiff {
    let empty = Columns::new();
    let source = source.unwrap_or(&empty);
    let target = target.unwrap_or(&empty);

    ColumnDiff {
        source_missing: missing_from(target, source, &options),
        target_missing: missing_from(source, target, &options),
    }
}

/// Columns of `present` that `other` lacks.
fn missing_from(present: &Columns, other: &Columns, options: &DiffOptions) -> Vec<Column> {
    let known: HashSet<String> = other.iter().map(|c| c.name().to_lowercase()).collect();

    let mut missing: Vec<Column> = present
        .iter()
        .filter(|c| !known.contains(&c.name().to_lowercase()))
        .filter(|c| !should_skip_column(c.name(), options))
        .cloned()
        .collect();

    missing.sort_by(|a, b| {
        a.name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| a.name().cmp(b.name()))
    });
    missing
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
