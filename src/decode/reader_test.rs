use crate::config::CodecConfig;
use crate::decode::reader::RowCursor;
use crate::encode::column::ColumnBuffer;
use crate::encode::writer::ValueWriter;
use crate::errors::CodecError;
use crate::schema::logical::{Field, LogicalType, Schema};
use crate::schema::mapper::map_schema;
use crate::schema::physical::{PhysicalSchema, PhysicalType};
use crate::value::row::Row;
use crate::value::Value;

type Chunks = Vec<(Option<Vec<u8>>, Vec<u8>)>;

fn write_rows(schema: &Schema, rows: &[Vec<Value>]) -> (PhysicalSchema, Chunks) {
    let physical = map_schema(schema).expect("map schema");
    let config = CodecConfig::default();
    let mut writers: Vec<ValueWriter> = physical
        .columns
        .iter()
        .map(|c| ValueWriter::build(c, &config, ""))
        .collect();
    for row in rows {
        for (w, v) in writers.iter_mut().zip(row) {
            w.write(v, 0, 0).expect("write");
        }
    }
    let mut chunks = Vec::new();
    for w in writers {
        w.finish(&mut chunks);
    }
    let chunks = chunks
        .into_iter()
        .map(|c| (c.dict_page, c.pages))
        .collect();
    (physical, chunks)
}

fn read_all(physical: &PhysicalSchema, chunks: Chunks, count: u64) -> Vec<Row> {
    let mut cursor = RowCursor::new(physical, chunks, count).expect("cursor");
    let mut rows = Vec::new();
    while let Some(row) = cursor.read_next().expect("row") {
        rows.push(row);
    }
    rows
}

fn tags_schema() -> Schema {
    Schema::new(vec![
        Field::required(1, "id", LogicalType::Int64),
        Field::optional(2, "name", LogicalType::String),
        Field::optional(
            3,
            "tags",
            LogicalType::List {
                element: Box::new(Field::optional(4, "element", LogicalType::String)),
            },
        ),
    ])
    .expect("schema")
}

#[test]
fn empty_list_and_null_list_read_back_distinct() {
    let schema = tags_schema();
    let rows = vec![
        vec![
            Value::I64(1),
            Value::Str("a".into()),
            Value::List(vec![Value::Str("x".into()), Value::Str("y".into())]),
        ],
        vec![Value::I64(2), Value::Null, Value::List(vec![])],
        vec![Value::I64(3), Value::Str("a".into()), Value::Null],
    ];
    let (physical, chunks) = write_rows(&schema, &rows);
    let decoded = read_all(&physical, chunks, 3);

    assert_eq!(decoded.len(), 3);
    assert_eq!(
        decoded[0].values()[2],
        Value::List(vec![Value::Str("x".into()), Value::Str("y".into())])
    );
    assert_eq!(decoded[1].values()[1], Value::Null);
    assert_eq!(decoded[1].values()[2], Value::List(vec![]));
    assert_eq!(decoded[2].values()[2], Value::Null);
}

#[test]
fn nested_struct_with_null_branch_reads_back() {
    let schema = Schema::new(vec![Field::optional(
        1,
        "who",
        LogicalType::Struct(vec![
            Field::required(2, "name", LogicalType::String),
            Field::optional(
                3,
                "address",
                LogicalType::Struct(vec![
                    Field::required(4, "city", LogicalType::String),
                    Field::optional(5, "zip", LogicalType::Int32),
                ]),
            ),
        ]),
    )])
    .expect("schema");

    let rows = vec![
        vec![Value::Struct(vec![
            Value::Str("ann".into()),
            Value::Struct(vec![Value::Str("oslo".into()), Value::Null]),
        ])],
        vec![Value::Struct(vec![Value::Str("bob".into()), Value::Null])],
        vec![Value::Null],
    ];
    let (physical, chunks) = write_rows(&schema, &rows);
    let decoded = read_all(&physical, chunks, 3);

    assert_eq!(decoded[0].values()[0], rows[0][0]);
    assert_eq!(decoded[1].values()[0], rows[1][0]);
    assert_eq!(decoded[2].values()[0], Value::Null);
}

#[test]
fn map_entries_read_back_in_written_order() {
    let schema = Schema::new(vec![Field::optional(
        1,
        "attrs",
        LogicalType::Map {
            key: Box::new(Field::required(2, "key", LogicalType::String)),
            value: Box::new(Field::optional(3, "value", LogicalType::Int32)),
        },
    )])
    .expect("schema");

    let rows = vec![
        vec![Value::Map(vec![
            (Value::Str("b".into()), Value::I32(2)),
            (Value::Str("a".into()), Value::Null),
        ])],
        vec![Value::Map(vec![])],
    ];
    let (physical, chunks) = write_rows(&schema, &rows);
    let decoded = read_all(&physical, chunks, 2);

    assert_eq!(decoded[0].values()[0], rows[0][0]);
    assert_eq!(decoded[1].values()[0], Value::Map(vec![]));
}

#[test]
fn list_of_lists_round_trips() {
    let schema = Schema::new(vec![Field::optional(
        1,
        "grid",
        LogicalType::List {
            element: Box::new(Field::optional(
                2,
                "row",
                LogicalType::List {
                    element: Box::new(Field::required(3, "cell", LogicalType::Int32)),
                },
            )),
        },
    )])
    .expect("schema");

    let value = Value::List(vec![
        Value::List(vec![Value::I32(1), Value::I32(2)]),
        Value::List(vec![]),
        Value::Null,
        Value::List(vec![Value::I32(3)]),
    ]);
    let rows = vec![vec![value.clone()]];
    let (physical, chunks) = write_rows(&schema, &rows);
    let decoded = read_all(&physical, chunks, 1);

    assert_eq!(decoded[0].values()[0], value);
}

#[test]
fn trailing_column_data_is_corrupt_data() {
    let schema = tags_schema();
    let rows = vec![
        vec![Value::I64(1), Value::Null, Value::Null],
        vec![Value::I64(2), Value::Null, Value::Null],
    ];
    let (physical, chunks) = write_rows(&schema, &rows);

    // Claim one row fewer than was written.
    let mut cursor = RowCursor::new(&physical, chunks, 1).expect("cursor");
    cursor.read_next().expect("row");
    let err = cursor.read_next().unwrap_err();
    assert!(matches!(err, CodecError::CorruptData(_)));
}

#[test]
fn exhausted_stream_before_row_count_is_corrupt_data() {
    let schema = tags_schema();
    let rows = vec![vec![Value::I64(1), Value::Null, Value::Null]];
    let (physical, chunks) = write_rows(&schema, &rows);

    let mut cursor = RowCursor::new(&physical, chunks, 2).expect("cursor");
    cursor.read_next().expect("row");
    let err = cursor.read_next().unwrap_err();
    assert!(matches!(err, CodecError::CorruptData(_)));
}

#[test]
fn extra_chunks_are_rejected_up_front() {
    let schema = tags_schema();
    let rows = vec![vec![Value::I64(1), Value::Null, Value::Null]];
    let (physical, mut chunks) = write_rows(&schema, &rows);
    chunks.push((None, Vec::new()));

    let err = RowCursor::new(&physical, chunks, 1).unwrap_err();
    assert!(matches!(err, CodecError::CorruptData(_)));
}

#[test]
fn record_starting_mid_sequence_is_corrupt_data() {
    let schema = Schema::new(vec![Field::required(1, "id", LogicalType::Int32)])
        .expect("schema");
    let physical = map_schema(&schema).expect("map schema");

    // Hand-build a chunk whose first entry claims repetition level 1.
    let config = CodecConfig::default();
    let mut col = ColumnBuffer::new("id", PhysicalType::I32, &config);
    col.push_value(1, 0, &9i32.to_le_bytes());
    let chunk = col.finish();

    let mut cursor =
        RowCursor::new(&physical, vec![(chunk.dict_page, chunk.pages)], 1).expect("cursor");
    let err = cursor.read_next().unwrap_err();
    assert!(matches!(err, CodecError::CorruptData(_)));
}
