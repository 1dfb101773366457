use super::*;

#[test]
fn test_try_new_rejects_blank() {
    assert!(TableName::try_new("").is_none());
    assert!(TableName::try_new("   ").is_none());
    assert_eq!(TableName::try_new("orders").unwrap().as_str(), "orders");
}

#[test]
fn test_case_insensitive_identity() {
    let name = TableName::new("DB.Public.Orders");
    assert!(name.matches("db.public.orders"));
    assert!(!name.matches("db.public.order"));
    assert_eq!(name.key(), "db.public.orders");
    assert_eq!(name.to_string(), "DB.Public.Orders");
}

#[test]
fn test_staging_keeps_qualifier() {
    let staging = TableName::new("project.dataset.orders").staging("staging");
    assert_eq!(staging.as_str(), "project.dataset.orders_staging");
    assert!(staging.starts_with("project.dataset."));
}

#[test]
fn test_deserializes_from_plain_string() {
    let name: TableName = serde_yaml::from_str("db.public.orders").unwrap();
    assert_eq!(name, TableName::new("db.public.orders"));
}
