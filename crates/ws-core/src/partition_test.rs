use super::*;

fn daily(field: &str) -> BigQueryPartitionSettings {
    BigQueryPartitionSettings {
        partition_type: "time".to_string(),
        partition_field: field.to_string(),
        partition_by: "daily".to_string(),
    }
}

#[test]
fn test_merge_predicate_daily() {
    let settings = daily("created_at");
    let predicate = settings
        .merge_predicate(&["2024-01-01", "2024-01-02"])
        .unwrap();
    assert_eq!(
        predicate,
        "DATE(c.created_at) IN ('2024-01-01','2024-01-02')"
    );
}

#[test]
fn test_merge_predicate_empty_values() {
    let empty: [&str; 0] = [];
    let err = daily("created_at").merge_predicate(&empty).unwrap_err();
    assert!(err.to_string().contains("values cannot be empty"), "{}", err);
}

#[test]
fn test_validate_missing_fields() {
    let cases = [
        (
            BigQueryPartitionSettings {
                partition_type: String::new(),
                ..daily("ts")
            },
            "partition_type cannot be empty",
        ),
        (daily(""), "partition_field cannot be empty"),
        (
            BigQueryPartitionSettings {
                partition_by: String::new(),
                ..daily("ts")
            },
            "partition_by cannot be empty",
        ),
    ];

    for (settings, expected) in cases {
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains(expected), "{}", err);
    }
}

#[test]
fn test_validate_unsupported_values() {
    let settings = BigQueryPartitionSettings {
        partition_type: "range".to_string(),
        ..daily("ts")
    };
    assert!(settings.validate().is_err());

    let settings = BigQueryPartitionSettings {
        partition_by: "hourly".to_string(),
        ..daily("ts")
    };
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("daily"), "{}", err);
}

#[test]
fn test_deserialize_settings() {
    let yaml = r#"
partition_type: time
partition_field: created_at
partition_by: daily
"#;
    let settings: BigQueryPartitionSettings = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(settings, daily("created_at"));
    assert!(settings.validate().is_ok());
}
