use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::schema::logical::{Field, LogicalType, Schema};
use crate::schema::mapper::max_unscaled;
use crate::value::Value;
use crate::value::row::Row;

/// How leaf values are drawn.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Full-range values, boundary cases injected at a nonzero rate.
    Random,
    /// Values drawn from a tiny per-field pool, deliberately repetitive
    /// so column dictionaries stay small.
    Dictionary,
}

const NULL_IN: u32 = 10;
const BOUNDARY_IN: u32 = 20;
const POOL_SIZE: u64 = 5;

/// Reproducible random rows: identical seed, schema and count always
/// yield the identical sequence.
pub fn generate(schema: &Schema, count: usize, seed: u64) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| row(schema, &mut rng, Mode::Random))
        .collect()
}

/// Rows whose leaf values repeat heavily, keeping every column on the
/// dictionary-encoding path.
pub fn generate_dictionary_encodable(schema: &Schema, count: usize, seed: u64) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| row(schema, &mut rng, Mode::Dictionary))
        .collect()
}

/// A dictionary-friendly prefix of `dict_rows` rows followed by
/// full-range rows, forcing the mid-stream fallback to plain encoding
/// once the dictionary budget is crossed.
pub fn generate_fallback(schema: &Schema, count: usize, seed: u64, dict_rows: usize) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let mode = if i < dict_rows {
                Mode::Dictionary
            } else {
                Mode::Random
            };
            row(schema, &mut rng, mode)
        })
        .collect()
}

fn row(schema: &Schema, rng: &mut StdRng, mode: Mode) -> Row {
    Row::new(
        schema
            .fields()
            .iter()
            .map(|f| field_value(f, rng, mode))
            .collect(),
    )
}

fn field_value(field: &Field, rng: &mut StdRng, mode: Mode) -> Value {
    if field.nullable && rng.gen_ratio(1, NULL_IN) {
        return Value::Null;
    }
    match &field.ty {
        LogicalType::Unknown => Value::Null,
        LogicalType::Struct(children) => Value::Struct(
            children
                .iter()
                .map(|c| field_value(c, rng, mode))
                .collect(),
        ),
        LogicalType::List { element } => {
            let len = rng.gen_range(0..=3);
            Value::List((0..len).map(|_| field_value(element, rng, mode)).collect())
        }
        LogicalType::Map { key, value } => {
            let len = rng.gen_range(0..=3);
            let mut entries: Vec<(Value, Value)> = Vec::with_capacity(len);
            for _ in 0..len {
                // Keys must be unique within one map; a few retries are
                // enough at these sizes.
                let mut k = field_value(key, rng, mode);
                let mut attempts = 0;
                while entries.iter().any(|(existing, _)| *existing == k) {
                    attempts += 1;
                    if attempts > 8 {
                        break;
                    }
                    k = field_value(key, rng, Mode::Random);
                }
                if entries.iter().any(|(existing, _)| *existing == k) {
                    continue;
                }
                let v = field_value(value, rng, mode);
                entries.push((k, v));
            }
            Value::Map(entries)
        }
        ty => leaf_value(ty, rng, mode),
    }
}

fn leaf_value(ty: &LogicalType, rng: &mut StdRng, mode: Mode) -> Value {
    match mode {
        Mode::Dictionary => pool_value(ty, rng.gen_range(0..POOL_SIZE)),
        Mode::Random => {
            if rng.gen_ratio(1, BOUNDARY_IN) {
                boundary_value(ty, rng)
            } else {
                random_value(ty, rng)
            }
        }
    }
}

/// Deterministic per-type pool of `POOL_SIZE` values.
fn pool_value(ty: &LogicalType, k: u64) -> Value {
    match ty {
        LogicalType::Boolean => Value::Bool(k % 2 == 0),
        LogicalType::Int32 => Value::I32((k as i32 + 1) * 1_000),
        LogicalType::Int64 => Value::I64((k as i64 + 1) * 1_000_000),
        LogicalType::Float32 => Value::F32(k as f32 * 1.5),
        LogicalType::Float64 => Value::F64(k as f64 * 2.5),
        LogicalType::Decimal { precision, scale } => Value::Decimal {
            unscaled: k as i128 + 1,
            precision: *precision,
            scale: *scale,
        },
        LogicalType::Date => Value::Date(k as i32 * 30),
        LogicalType::Time => Value::Time(k as i64 * 3_600_000_000),
        LogicalType::Timestamp { unit, zoned } => Value::Timestamp {
            value: k as i64 * 86_400,
            unit: *unit,
            zoned: *zoned,
        },
        LogicalType::String => Value::Str(format!("val-{k}")),
        LogicalType::Binary => Value::Bytes(vec![k as u8; 3]),
        LogicalType::FixedBinary { len } => Value::Fixed(vec![k as u8; *len]),
        other => unreachable!("pool_value on nested type {other:?}"),
    }
}

fn boundary_value(ty: &LogicalType, rng: &mut StdRng) -> Value {
    match ty {
        LogicalType::Boolean => Value::Bool(rng.gen_bool(0.5)),
        LogicalType::Int32 => Value::I32(*pick(rng, &[i32::MIN, i32::MAX, 0, -1, 1])),
        LogicalType::Int64 => Value::I64(*pick(rng, &[i64::MIN, i64::MAX, 0, -1, 1])),
        LogicalType::Float32 => Value::F32(*pick(rng, &[f32::MIN, f32::MAX, 0.0, -0.0, 1.0])),
        LogicalType::Float64 => Value::F64(*pick(rng, &[f64::MIN, f64::MAX, 0.0, -0.0, 1.0])),
        LogicalType::Decimal { precision, scale } => {
            let max = max_unscaled(*precision);
            Value::Decimal {
                unscaled: *pick(rng, &[max, -max, 0]),
                precision: *precision,
                scale: *scale,
            }
        }
        LogicalType::Date => Value::Date(*pick(rng, &[i32::MIN, i32::MAX, 0])),
        LogicalType::Time => Value::Time(*pick(rng, &[0, 86_399_999_999])),
        LogicalType::Timestamp { unit, zoned } => Value::Timestamp {
            value: *pick(rng, &[i64::MIN, i64::MAX, 0]),
            unit: *unit,
            zoned: *zoned,
        },
        LogicalType::String => Value::Str(String::new()),
        LogicalType::Binary => Value::Bytes(Vec::new()),
        LogicalType::FixedBinary { len } => Value::Fixed(vec![0u8; *len]),
        other => unreachable!("boundary_value on nested type {other:?}"),
    }
}

fn random_value(ty: &LogicalType, rng: &mut StdRng) -> Value {
    match ty {
        LogicalType::Boolean => Value::Bool(rng.gen_bool(0.5)),
        LogicalType::Int32 => Value::I32(rng.gen_range(i32::MIN..=i32::MAX)),
        LogicalType::Int64 => Value::I64(rng.gen_range(i64::MIN..=i64::MAX)),
        LogicalType::Float32 => Value::F32(rng.gen_range(-1.0e6f32..1.0e6)),
        LogicalType::Float64 => Value::F64(rng.gen_range(-1.0e9f64..1.0e9)),
        LogicalType::Decimal { precision, scale } => {
            let max = max_unscaled(*precision);
            Value::Decimal {
                unscaled: random_i128(rng, max),
                precision: *precision,
                scale: *scale,
            }
        }
        LogicalType::Date => Value::Date(rng.gen_range(-100_000..=100_000)),
        LogicalType::Time => Value::Time(rng.gen_range(0..86_400_000_000)),
        LogicalType::Timestamp { unit, zoned } => Value::Timestamp {
            // Around ±50 years at any resolution without overflow.
            value: rng.gen_range(-1_600_000_000i64..1_600_000_000) * scale_hint(*unit)
                + rng.gen_range(0..scale_hint(*unit)),
            unit: *unit,
            zoned: *zoned,
        },
        LogicalType::String => {
            let len = rng.gen_range(0..=16);
            let s: String = (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect();
            Value::Str(s)
        }
        LogicalType::Binary => {
            let len = rng.gen_range(0..=16);
            let mut bytes = vec![0u8; len];
            rng.fill(&mut bytes[..]);
            Value::Bytes(bytes)
        }
        LogicalType::FixedBinary { len } => {
            let mut bytes = vec![0u8; *len];
            rng.fill(&mut bytes[..]);
            Value::Fixed(bytes)
        }
        other => unreachable!("random_value on nested type {other:?}"),
    }
}

fn scale_hint(unit: crate::schema::logical::TimeUnit) -> i64 {
    use crate::schema::logical::TimeUnit;
    match unit {
        TimeUnit::Millis => 1_000,
        TimeUnit::Micros => 1_000_000,
        TimeUnit::Nanos => 1_000_000_000,
    }
}

fn random_i128(rng: &mut StdRng, max: i128) -> i128 {
    let hi = rng.gen_range(0..=u64::MAX) as u128;
    let lo = rng.gen_range(0..=u64::MAX) as u128;
    let magnitude = ((hi << 64) | lo) % (max as u128 + 1);
    if rng.gen_bool(0.5) {
        magnitude as i128
    } else {
        -(magnitude as i128)
    }
}

fn pick<'a, T>(rng: &mut StdRng, options: &'a [T]) -> &'a T {
    &options[rng.gen_range(0..options.len())]
}
