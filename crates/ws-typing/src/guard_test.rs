use super::*;

const REDSHIFT_VARCHAR: usize = 65_535;
const REDSHIFT_SUPER: usize = 1024 * 1024;

fn string_column() -> Column {
    Column::new("body", KindDetails::String)
}

fn struct_column() -> Column {
    Column::new("payload", KindDetails::Struct)
}

fn text(len: usize) -> Value {
    Value::String("a".repeat(len))
}

#[test]
fn test_string_boundary() {
    let guard = ValueGuard::new(Dialect::Redshift);
    let column = string_column();

    let below = text(REDSHIFT_VARCHAR - 1);
    assert_eq!(guard.guard(below.clone(), &column), below);

    let at = text(REDSHIFT_VARCHAR);
    assert_eq!(guard.guard(at.clone(), &column), at);

    assert_eq!(
        guard.guard(text(REDSHIFT_VARCHAR + 1), &column),
        Value::String(EXCEEDED_VALUE_MARKER.to_string())
    );
}

#[test]
fn test_string_limit_counts_bytes() {
    let guard = ValueGuard::with_limits(4, 4);
    let column = string_column();

    // Two characters, four bytes
    let fits = Value::String("éé".to_string());
    assert_eq!(guard.guard(fits.clone(), &column), fits);

    let over = Value::String("ééé".to_string());
    assert_eq!(
        guard.guard(over, &column),
        Value::String(EXCEEDED_VALUE_MARKER.to_string())
    );
}

#[test]
fn test_struct_boundary() {
    let guard = ValueGuard::new(Dialect::Redshift);
    let column = struct_column();
    // {"k":"..."} adds 8 bytes of framing
    let framing = 8;

    let at = json!({ "k": "a".repeat(REDSHIFT_SUPER - framing) });
    assert_eq!(guard.guard(at.clone(), &column), at);

    let over = json!({ "k": "a".repeat(REDSHIFT_SUPER - framing + 1) });
    assert_eq!(
        guard.guard(over, &column),
        json!({ "key": EXCEEDED_VALUE_MARKER })
    );
}

#[test]
fn test_struct_value_as_string() {
    let guard = ValueGuard::with_limits(100, 10);
    let column = struct_column();
    assert_eq!(
        guard.guard(text(11), &column),
        json!({ "key": EXCEEDED_VALUE_MARKER })
    );
    assert_eq!(guard.guard(text(10), &column), text(10));
}

#[test]
fn test_non_string_value_in_string_column() {
    let guard = ValueGuard::with_limits(5, 5);
    let column = string_column();
    assert_eq!(guard.guard(json!(12345), &column), json!(12345));
    assert_eq!(
        guard.guard(json!(123456), &column),
        Value::String(EXCEEDED_VALUE_MARKER.to_string())
    );
}

#[test]
fn test_other_kinds_pass_through() {
    let guard = ValueGuard::with_limits(1, 1);
    let big = text(1000);
    for kind in [
        KindDetails::Integer,
        KindDetails::Float,
        KindDetails::Boolean,
        KindDetails::Array,
        KindDetails::Invalid,
    ] {
        let column = Column::new("c", kind);
        assert_eq!(guard.guard(big.clone(), &column), big);
    }
}

#[test]
fn test_null_passes_through() {
    let guard = ValueGuard::with_limits(1, 1);
    assert_eq!(guard.guard(Value::Null, &string_column()), Value::Null);
    assert_eq!(guard.guard(Value::Null, &struct_column()), Value::Null);
}

#[test]
fn test_guard_value_uses_dialect_limits() {
    let column = string_column();
    let value = text(REDSHIFT_VARCHAR + 1);
    assert_eq!(guard_value(value.clone(), &column, Dialect::Snowflake), value);
    assert_eq!(
        guard_value(value, &column, Dialect::Redshift),
        Value::String(EXCEEDED_VALUE_MARKER.to_string())
    );
}
