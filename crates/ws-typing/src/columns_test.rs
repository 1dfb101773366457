use super::*;
use crate::kind::ExtTimeKind;

fn sample() -> Columns {
    [
        Column::new("hello", KindDetails::String),
        Column::new("created_at", KindDetails::ETime(ExtTimeKind::DateTime)),
        Column::new("updated_at", KindDetails::ETime(ExtTimeKind::DateTime)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_add_column_ignores_case_duplicates() {
    let mut cols = Columns::new();
    assert!(cols.add_column(Column::new("CC", KindDetails::String)));
    assert!(!cols.add_column(Column::new("cC", KindDetails::Integer)));
    assert!(!cols.add_column(Column::new("cc", KindDetails::Boolean)));

    assert_eq!(cols.len(), 1);
    let col = cols.get_column("cc").unwrap();
    assert_eq!(col.name(), "CC");
    assert_eq!(col.kind(), &KindDetails::String);
}

#[test]
fn test_insertion_order_preserved() {
    let cols = sample();
    assert_eq!(cols.names(), vec!["hello", "created_at", "updated_at"]);
}

#[test]
fn test_upsert_keeps_position_and_case() {
    let mut cols = sample();
    cols.upsert_column(Column::new("CREATED_AT", KindDetails::String).with_primary_key(true));
    cols.upsert_column(Column::new("extra", KindDetails::Boolean));

    assert_eq!(
        cols.names(),
        vec!["hello", "created_at", "updated_at", "extra"]
    );
    let created = cols.get_column("created_at").unwrap();
    assert_eq!(created.kind(), &KindDetails::String);
    assert!(created.is_primary_key());
}

#[test]
fn test_delete_column() {
    let mut cols = sample();
    let removed = cols.delete_column("HELLO").unwrap();
    assert_eq!(removed.name(), "hello");
    assert_eq!(cols.len(), 2);
    assert!(cols.delete_column("missing").is_none());
}

#[test]
fn test_backfilled_flag() {
    let mut cols = sample();
    assert!(!cols.get_column("hello").unwrap().is_backfilled());
    cols.get_column_mut("hello").unwrap().set_backfilled(true);
    assert!(cols.get_column("hello").unwrap().is_backfilled());
}

#[test]
fn test_clone_columns_is_independent() {
    let cols = sample();
    let mut copied = clone_columns(Some(&cols));
    assert_eq!(copied, cols);

    copied.delete_column("hello");
    copied.get_column_mut("created_at").unwrap().set_backfilled(true);
    assert_ne!(copied, cols);
    assert_eq!(cols.len(), 3);
    assert!(!cols.get_column("created_at").unwrap().is_backfilled());
    assert_eq!(
        cols.get_column("created_at").unwrap().kind(),
        &KindDetails::ETime(ExtTimeKind::DateTime)
    );
}

#[test]
fn test_clone_columns_none_and_empty() {
    assert!(clone_columns(None).is_empty());
    assert!(clone_columns(Some(&Columns::new())).is_empty());
}

#[test]
fn test_clone_columns_preserves_case() {
    let cols: Columns = ["foo", "bAr", "XYZ"]
        .into_iter()
        .map(|n| Column::new(n, KindDetails::String))
        .collect();
    assert_eq!(clone_columns(Some(&cols)).names(), vec!["foo", "bAr", "XYZ"]);
}
