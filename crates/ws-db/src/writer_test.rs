use super::*;
use crate::test_utils::{RecordingMetrics, RecordingWarehouse};
use crate::traits::ColumnDescription;
use serde_json::json;
use ws_core::markers::{DELETE_COLUMN_MARKER, EXCEEDED_VALUE_MARKER};
use ws_typing::{Decimal, KindDetails};

const ORDERS: &str = "db.public.orders";

fn config(yaml: &str) -> Config {
    Config::from_yaml(yaml).unwrap()
}

fn snowflake_config() -> Config {
    config(
        r#"
destination: snowflake
tables:
  - name: db.public.orders
    primary_keys: [id]
    idempotent_key: updated_at
"#,
    )
}

fn batch_columns() -> Columns {
    [
        Column::new("id", KindDetails::Integer),
        Column::new("name", KindDetails::String),
        Column::new("updated_at", KindDetails::String),
        Column::new(DELETE_COLUMN_MARKER, KindDetails::Boolean),
    ]
    .into_iter()
    .collect()
}

fn row(id: i64, name: &str) -> Row {
    let value = json!({
        "id": id,
        "name": name,
        "updated_at": "2024-01-01T00:00:00Z",
        DELETE_COLUMN_MARKER: false,
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn existing_table() -> Vec<ColumnDescription> {
    vec![
        ColumnDescription::new("ID", "NUMBER(38,0)"),
        ColumnDescription::new("NAME", "VARCHAR(16777216)"),
        ColumnDescription::new("UPDATED_AT", "VARCHAR(16777216)"),
        ColumnDescription::new("__ARTIE_DELETE", "BOOLEAN"),
    ]
}

fn data(rows: Vec<Row>) -> TableData {
    TableData::new(TableName::new(ORDERS), batch_columns(), rows)
}

#[tokio::test]
async fn test_flush_merges_through_staging() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    let writer = TableWriter::new(warehouse, snowflake_config());

    let summary = writer
        .flush(&data(vec![row(1, "a"), row(2, "b")]))
        .await
        .unwrap();
    assert_eq!(summary.rows, 2);
    assert!(summary.added_columns.is_empty());
    assert!(!summary.retried);

    let executed = writer.warehouse().executed();
    assert_eq!(executed.len(), 4, "{:#?}", executed);
    assert_eq!(executed[0], "DROP TABLE IF EXISTS db.public.orders_staging");
    assert!(executed[1].starts_with("CREATE TABLE IF NOT EXISTS db.public.orders_staging"));
    assert!(executed[2].starts_with("MERGE INTO db.public.orders c USING (SELECT id,name,updated_at,__artie_delete FROM db.public.orders_staging) AS cc"));
    assert!(executed[2].contains("cc.updated_at >= c.updated_at"));
    assert_eq!(executed[3], "DROP TABLE IF EXISTS db.public.orders_staging");

    let staged = writer.warehouse().staged();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].0, "db.public.orders_staging");
    assert_eq!(staged[0].1.len(), 2);
}

#[tokio::test]
async fn test_flush_adds_missing_columns() {
    let warehouse = RecordingWarehouse::new().with_table(
        ORDERS,
        vec![
            ColumnDescription::new("ID", "NUMBER(38,0)"),
            ColumnDescription::new("__ARTIE_DELETE", "BOOLEAN"),
        ],
    );
    let writer = TableWriter::new(warehouse, snowflake_config());

    let summary = writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    assert_eq!(summary.added_columns, vec!["name", "updated_at"]);

    let executed = writer.warehouse().executed();
    assert_eq!(executed[0], "ALTER TABLE db.public.orders ADD COLUMN name string");
    assert_eq!(executed[1], "ALTER TABLE db.public.orders ADD COLUMN updated_at string");

    let cached = writer.cache().get(&TableName::new(ORDERS)).unwrap().unwrap();
    assert!(cached.get_column("name").is_some());
    assert!(cached.get_column("updated_at").is_some());
}

#[tokio::test]
async fn test_already_exists_race_is_success() {
    let warehouse = RecordingWarehouse::new().with_table(
        ORDERS,
        vec![ColumnDescription::new("ID", "NUMBER(38,0)")],
    );
    warehouse.fail_next(
        "ADD COLUMN name",
        "SQL compilation error: column 'NAME' already exists",
    );
    let writer = TableWriter::new(warehouse, snowflake_config());

    let summary = writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    assert!(summary.added_columns.contains(&"name".to_string()));
}

#[tokio::test]
async fn test_other_ddl_errors_propagate() {
    let warehouse = RecordingWarehouse::new();
    warehouse.fail_next("ADD COLUMN", "insufficient privileges");
    let writer = TableWriter::new(warehouse, snowflake_config());

    let err = writer.flush(&data(vec![row(1, "a")])).await.unwrap_err();
    assert!(err.to_string().contains("insufficient privileges"), "{}", err);
    assert!(writer
        .warehouse()
        .executed()
        .iter()
        .all(|s| !s.starts_with("MERGE")));
}

#[tokio::test]
async fn test_describe_is_cached() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    let writer = TableWriter::new(warehouse, snowflake_config());

    writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    writer.flush(&data(vec![row(2, "b")])).await.unwrap();
    assert_eq!(writer.warehouse().describe_count(), 1);
}

#[tokio::test]
async fn test_auth_expiry_retries_merge_once() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    warehouse.fail_next("MERGE INTO", "390114: Authentication token has expired");
    let metrics = Arc::new(RecordingMetrics::default());
    let writer = TableWriter::new(warehouse, snowflake_config()).with_metrics(metrics.clone());

    let summary = writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    assert!(summary.retried);
    assert_eq!(writer.warehouse().reconnect_count(), 1);

    let merges = writer
        .warehouse()
        .executed()
        .iter()
        .filter(|s| s.starts_with("MERGE"))
        .count();
    assert_eq!(merges, 2);
    assert!(metrics.names().contains(&"flush.reconnect".to_string()));
}

#[tokio::test]
async fn test_auth_expiry_retried_only_once() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    for _ in 0..2 {
        warehouse.fail_next("MERGE INTO", "Authentication token has expired");
    }
    let writer = TableWriter::new(warehouse, snowflake_config());

    let err = writer.flush(&data(vec![row(1, "a")])).await.unwrap_err();
    assert!(err.is_authentication_expired());
    assert_eq!(writer.warehouse().reconnect_count(), 1);
    assert_eq!(
        writer.warehouse().executed().last().map(String::as_str),
        Some("DROP TABLE IF EXISTS db.public.orders_staging")
    );
}

#[tokio::test]
async fn test_non_auth_merge_error_not_retried() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    warehouse.fail_next("MERGE INTO", "division by zero");
    let writer = TableWriter::new(warehouse, snowflake_config());

    assert!(writer.flush(&data(vec![row(1, "a")])).await.is_err());
    assert_eq!(writer.warehouse().reconnect_count(), 0);
}

#[tokio::test]
async fn test_oversized_values_are_guarded() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    let writer = TableWriter::new(warehouse, config(
        r#"
destination: redshift
tables:
  - name: db.public.orders
    primary_keys: [id]
"#,
    ));

    let long = "x".repeat(70_000);
    writer.flush(&data(vec![row(1, &long)])).await.unwrap();

    let staged = writer.warehouse().staged();
    assert_eq!(staged[0].1[0]["name"], json!(EXCEEDED_VALUE_MARKER));
    assert_eq!(staged[0].1[0]["id"], json!(1));
}

#[tokio::test]
async fn test_drop_deleted_columns() {
    let mut described = existing_table();
    described.push(ColumnDescription::new("LEGACY", "VARCHAR(10)"));
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, described);
    let writer = TableWriter::new(
        warehouse,
        config(
            r#"
drop_deleted_columns: true
tables:
  - name: db.public.orders
    primary_keys: [id]
"#,
        ),
    );

    let summary = writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    assert_eq!(summary.dropped_columns, vec!["LEGACY"]);
    assert!(writer
        .warehouse()
        .executed()
        .contains(&"ALTER TABLE db.public.orders DROP COLUMN \"LEGACY\"".to_string()));
}

#[tokio::test]
async fn test_redshift_flush_runs_staged_statements() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    let writer = TableWriter::new(
        warehouse,
        config(
            r#"
destination: redshift
soft_delete: true
tables:
  - name: db.public.orders
    primary_keys: [id]
"#,
        ),
    );

    writer.flush(&data(vec![row(1, "a")])).await.unwrap();
    let executed = writer.warehouse().executed();
    assert_eq!(executed.len(), 6, "{:#?}", executed);
    assert!(executed[2].starts_with("UPDATE db.public.orders AS c SET __artie_delete=cc.__artie_delete FROM db.public.orders_staging AS cc"));
    assert!(executed[4].starts_with("INSERT INTO db.public.orders"));
}

#[tokio::test]
async fn test_bigquery_partition_pruning() {
    let warehouse = RecordingWarehouse::new().with_table(
        "p.d.orders",
        vec![
            ColumnDescription::new("id", "INT64"),
            ColumnDescription::new("name", "STRING"),
            ColumnDescription::new("updated_at", "STRING"),
            ColumnDescription::new("__artie_delete", "BOOL"),
        ],
    );
    let writer = TableWriter::new(
        warehouse,
        config(
            r#"
destination: bigquery
tables:
  - name: p.d.orders
    primary_keys: [id]
    bigquery_partition:
      partition_type: time
      partition_field: created_at
      partition_by: daily
"#,
        ),
    );

    let mut batch = TableData::new(TableName::new("p.d.orders"), batch_columns(), vec![row(1, "a")]);
    batch.distinct_dates = vec!["2024-01-01".to_string(), "2024-01-02".to_string()];
    writer.flush(&batch).await.unwrap();

    let merge = writer
        .warehouse()
        .executed()
        .into_iter()
        .find(|s| s.starts_with("MERGE"))
        .unwrap();
    assert!(merge.contains("USING p.d.orders_staging AS cc ON c.id = cc.id AND DATE(c.created_at) IN ('2024-01-01','2024-01-02')"), "{}", merge);
}

#[tokio::test]
async fn test_unconfigured_table_rejected() {
    let writer = TableWriter::new(RecordingWarehouse::new(), snowflake_config());
    let batch = TableData::new(TableName::new("db.public.other"), batch_columns(), vec![row(1, "a")]);
    let err = writer.flush(&batch).await.unwrap_err();
    assert!(matches!(err, DbError::TableNotConfigured(_)));
}

#[tokio::test]
async fn test_empty_batch_is_a_no_op() {
    let writer = TableWriter::new(RecordingWarehouse::new(), snowflake_config());
    let summary = writer.flush(&data(Vec::new())).await.unwrap();
    assert_eq!(summary.rows, 0);
    assert!(writer.warehouse().executed().is_empty());
}

#[tokio::test]
async fn test_staging_dropped_when_load_fails() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    warehouse.fail_next_load("COPY rejected: column count mismatch");
    let writer = TableWriter::new(warehouse, snowflake_config());

    let err = writer.flush(&data(vec![row(1, "a")])).await.unwrap_err();
    assert!(matches!(err, DbError::LoadError(_)), "{}", err);

    let executed = writer.warehouse().executed();
    assert!(executed.iter().all(|s| !s.starts_with("MERGE")));
    assert_eq!(
        executed.last().map(String::as_str),
        Some("DROP TABLE IF EXISTS db.public.orders_staging")
    );
    assert!(writer.warehouse().staged().is_empty());

    // The next flush starts from a fresh staging table and merges only its own rows.
    writer.flush(&data(vec![row(2, "b")])).await.unwrap();
    let executed = writer.warehouse().executed();
    let create = executed
        .iter()
        .rposition(|s| s.starts_with("CREATE TABLE"))
        .unwrap();
    assert_eq!(executed[create - 1], "DROP TABLE IF EXISTS db.public.orders_staging");
    let staged = writer.warehouse().staged();
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].1[0]["id"], json!(2));
}

#[tokio::test]
async fn test_missing_delete_marker_is_staged_as_false() {
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, existing_table());
    let writer = TableWriter::new(warehouse, snowflake_config());

    let columns: Columns = [
        Column::new("id", KindDetails::Integer),
        Column::new("name", KindDetails::String),
    ]
    .into_iter()
    .collect();
    let mut only_id = Row::new();
    only_id.insert("id".to_string(), json!(7));
    only_id.insert("name".to_string(), json!("g"));
    let batch = TableData::new(TableName::new(ORDERS), columns, vec![only_id]);

    writer.flush(&batch).await.unwrap();

    let executed = writer.warehouse().executed();
    let create = executed.iter().find(|s| s.starts_with("CREATE TABLE")).unwrap();
    assert!(create.contains("__artie_delete"), "{}", create);
    let merge = executed.iter().find(|s| s.starts_with("MERGE")).unwrap();
    assert!(
        merge.contains("USING (SELECT id,name,__artie_delete FROM db.public.orders_staging) AS cc"),
        "{}",
        merge
    );
    assert_eq!(writer.warehouse().staged()[0].1[0][DELETE_COLUMN_MARKER], json!(false));
}

#[tokio::test]
async fn test_decimal_values_staged_at_column_scale() {
    let mut described = existing_table();
    described.push(ColumnDescription::new("AMOUNT", "NUMBER(10,2)"));
    let warehouse = RecordingWarehouse::new().with_table(ORDERS, described);
    let writer = TableWriter::new(warehouse, snowflake_config());

    let mut columns = batch_columns();
    columns.add_column(Column::new(
        "amount",
        KindDetails::EDecimal(Decimal::new(2, Some(10))),
    ));
    let mut priced = row(1, "a");
    priced.insert("amount".to_string(), json!(12.345));
    let batch = TableData::new(TableName::new(ORDERS), columns, vec![priced]);

    writer.flush(&batch).await.unwrap();
    assert_eq!(writer.warehouse().staged()[0].1[0]["amount"], json!("12.34"));
}
