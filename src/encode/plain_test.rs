use crate::encode::plain::encode_value;
use crate::errors::CodecError;
use crate::schema::logical::{LogicalType, TimeUnit};
use crate::schema::physical::PhysicalType;
use crate::value::Value;

#[test]
fn numeric_widths_and_endianness_are_exact() {
    let bytes = encode_value(&LogicalType::Int32, PhysicalType::I32, &Value::I32(1), "c")
        .expect("encode");
    assert_eq!(bytes, vec![1, 0, 0, 0]);

    let bytes = encode_value(
        &LogicalType::Int64,
        PhysicalType::I64,
        &Value::I64(i64::MIN),
        "c",
    )
    .expect("encode");
    assert_eq!(bytes, i64::MIN.to_le_bytes().to_vec());
}

#[test]
fn string_carries_length_prefix() {
    let bytes = encode_value(
        &LogicalType::String,
        PhysicalType::Bytes,
        &Value::Str("ab".into()),
        "c",
    )
    .expect("encode");
    assert_eq!(bytes, vec![2, 0, 0, 0, b'a', b'b']);

    let empty = encode_value(
        &LogicalType::String,
        PhysicalType::Bytes,
        &Value::Str(String::new()),
        "c",
    )
    .expect("encode");
    assert_eq!(empty, vec![0, 0, 0, 0]);
}

#[test]
fn wrong_variant_is_a_schema_mismatch() {
    let err = encode_value(&LogicalType::Int32, PhysicalType::I32, &Value::Str("x".into()), "c")
        .unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch { .. }));
}

#[test]
fn decimal_scale_must_match_declaration() {
    let logical = LogicalType::Decimal { precision: 9, scale: 2 };
    let err = encode_value(
        &logical,
        PhysicalType::I32,
        &Value::Decimal {
            unscaled: 100,
            precision: 9,
            scale: 3,
        },
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch { .. }));
}

#[test]
fn decimal_overflowing_precision_is_precision_loss() {
    let logical = LogicalType::Decimal { precision: 4, scale: 0 };
    let err = encode_value(
        &logical,
        PhysicalType::I32,
        &Value::Decimal {
            unscaled: 10_000,
            precision: 4,
            scale: 0,
        },
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::PrecisionLoss { .. }));
}

#[test]
fn wide_decimal_uses_minimal_two_complement_bytes() {
    let logical = LogicalType::Decimal { precision: 19, scale: 0 };
    let bytes = encode_value(
        &logical,
        PhysicalType::I128(9),
        &Value::Decimal {
            unscaled: -1,
            precision: 19,
            scale: 0,
        },
        "c",
    )
    .expect("encode");
    assert_eq!(bytes, vec![0xFF; 9]);
}

#[test]
fn nanos_narrowed_to_millis_is_precision_loss() {
    let logical = LogicalType::Timestamp {
        unit: TimeUnit::Millis,
        zoned: false,
    };
    let err = encode_value(
        &logical,
        PhysicalType::I64,
        &Value::Timestamp {
            value: 1_000_001,
            unit: TimeUnit::Nanos,
            zoned: false,
        },
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::PrecisionLoss { .. }));
}

#[test]
fn millis_widened_to_nanos_is_lossless() {
    let logical = LogicalType::Timestamp {
        unit: TimeUnit::Nanos,
        zoned: false,
    };
    let bytes = encode_value(
        &logical,
        PhysicalType::I64,
        &Value::Timestamp {
            value: 5,
            unit: TimeUnit::Millis,
            zoned: false,
        },
        "c",
    )
    .expect("encode");
    assert_eq!(bytes, 5_000_000i64.to_le_bytes().to_vec());
}

#[test]
fn fixed_binary_length_is_enforced() {
    let logical = LogicalType::FixedBinary { len: 4 };
    let err = encode_value(
        &logical,
        PhysicalType::FixedBytes(4),
        &Value::Fixed(vec![1, 2, 3]),
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch { .. }));
}

#[test]
fn unknown_rejects_any_value() {
    let err = encode_value(
        &LogicalType::Unknown,
        PhysicalType::Bytes,
        &Value::I32(1),
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::SchemaMismatch { .. }));
}
