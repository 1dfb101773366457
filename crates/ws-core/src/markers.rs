//! Bookkeeping column names and sentinel values written alongside the
//! source entity's own columns.

/// Boolean column flagging a row as deleted upstream.
pub const DELETE_COLUMN_MARKER: &str = "__artie_delete";

/// Timestamp column recording when the row was last written by the sync.
pub const UPDATE_COLUMN_MARKER: &str = "__artie_updated_at";

/// Replaces values that exceed the destination's column length limit.
pub const EXCEEDED_VALUE_MARKER: &str = "__artie_exceeded_value";

/// Returns true if `name` is one of the bookkeeping marker columns.
pub fn is_marker_column(name: &str) -> bool {
    name.eq_ignore_ascii_case(DELETE_COLUMN_MARKER) || name.eq_ignore_ascii_case(UPDATE_COLUMN_MARKER)
}
