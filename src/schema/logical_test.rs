use crate::schema::logical::{Field, LogicalType, Schema, TimeUnit};

fn string_field(id: i32, name: &str) -> Field {
    Field::optional(id, name, LogicalType::String)
}

#[test]
fn schema_accepts_unique_ids_across_nesting() {
    let schema = Schema::new(vec![
        Field::required(1, "id", LogicalType::Int64),
        Field::optional(
            2,
            "props",
            LogicalType::Struct(vec![string_field(3, "a"), string_field(4, "b")]),
        ),
        Field::optional(
            5,
            "tags",
            LogicalType::List {
                element: Box::new(string_field(6, "element")),
            },
        ),
    ]);
    assert!(schema.is_ok());
}

#[test]
fn schema_rejects_duplicate_ids() {
    let err = Schema::new(vec![
        Field::required(1, "id", LogicalType::Int64),
        Field::optional(
            2,
            "nested",
            LogicalType::Struct(vec![string_field(1, "shadow")]),
        ),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate field id 1"));
}

#[test]
fn schema_rejects_nullable_map_key() {
    let err = Schema::new(vec![Field::optional(
        1,
        "m",
        LogicalType::Map {
            key: Box::new(Field::optional(2, "key", LogicalType::String)),
            value: Box::new(Field::optional(3, "value", LogicalType::Int32)),
        },
    )])
    .unwrap_err();
    assert!(err.to_string().contains("nullable key"));
}

#[test]
fn schema_rejects_required_unknown() {
    let err = Schema::new(vec![Field::required(1, "u", LogicalType::Unknown)]).unwrap_err();
    assert!(err.to_string().contains("must be nullable"));
}

#[test]
fn schema_rejects_empty_struct() {
    let err = Schema::new(vec![Field::optional(1, "s", LogicalType::Struct(vec![]))]).unwrap_err();
    assert!(err.to_string().contains("no children"));
}

#[test]
fn time_unit_nanos_per_unit() {
    assert_eq!(TimeUnit::Millis.nanos_per_unit(), 1_000_000);
    assert_eq!(TimeUnit::Micros.nanos_per_unit(), 1_000);
    assert_eq!(TimeUnit::Nanos.nanos_per_unit(), 1);
}
