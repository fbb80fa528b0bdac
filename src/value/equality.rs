use crate::schema::logical::{Field, LogicalType, Schema};
use crate::value::row::RowAccess;
use crate::value::{Value, convert_timestamp};

/// First point of divergence between two rows, reported by field path.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub path: String,
    pub detail: String,
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.detail)
    }
}

/// Logical-type-aware structural equality.
///
/// Decimal comparison ignores representation width, timestamps compare at
/// the declared resolution, floats compare bitwise (NaN round-trips), and
/// map entries compare unordered but duplicate-key sensitive.
pub fn rows_logically_equal<A: RowAccess, B: RowAccess>(
    schema: &Schema,
    expected: &A,
    actual: &B,
) -> Result<(), Mismatch> {
    let fields = schema.fields();
    if expected.width() != fields.len() || actual.width() != fields.len() {
        return Err(Mismatch {
            path: "<row>".to_string(),
            detail: format!(
                "row width {} vs {} (schema has {})",
                expected.width(),
                actual.width(),
                fields.len()
            ),
        });
    }
    for (i, field) in fields.iter().enumerate() {
        values_equal(field, expected.get(i), actual.get(i), &field.name)?;
    }
    Ok(())
}

fn fail(path: &str, detail: String) -> Result<(), Mismatch> {
    Err(Mismatch {
        path: path.to_string(),
        detail,
    })
}

fn values_equal(field: &Field, a: &Value, b: &Value, path: &str) -> Result<(), Mismatch> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(()),
        (Value::Null, other) | (other, Value::Null) => {
            fail(path, format!("null vs {}", other.kind()))
        }
        _ => typed_equal(field, a, b, path),
    }
}

fn typed_equal(field: &Field, a: &Value, b: &Value, path: &str) -> Result<(), Mismatch> {
    match (&field.ty, a, b) {
        (LogicalType::Boolean, Value::Bool(x), Value::Bool(y)) if x == y => Ok(()),
        (LogicalType::Int32, Value::I32(x), Value::I32(y)) if x == y => Ok(()),
        (LogicalType::Int64, Value::I64(x), Value::I64(y)) if x == y => Ok(()),
        (LogicalType::Date, Value::Date(x), Value::Date(y)) if x == y => Ok(()),
        (LogicalType::Time, Value::Time(x), Value::Time(y)) if x == y => Ok(()),
        (LogicalType::Float32, Value::F32(x), Value::F32(y)) if x.to_bits() == y.to_bits() => {
            Ok(())
        }
        (LogicalType::Float64, Value::F64(x), Value::F64(y)) if x.to_bits() == y.to_bits() => {
            Ok(())
        }
        (
            LogicalType::Decimal { .. },
            Value::Decimal {
                unscaled: ua,
                scale: sa,
                ..
            },
            Value::Decimal {
                unscaled: ub,
                scale: sb,
                ..
            },
        ) => {
            // Precision is representation width; identity is unscaled+scale.
            if ua == ub && sa == sb {
                Ok(())
            } else {
                fail(path, format!("decimal {ua}e-{sa} vs {ub}e-{sb}"))
            }
        }
        (
            LogicalType::Timestamp { unit, zoned },
            Value::Timestamp {
                value: va,
                unit: ua,
                zoned: za,
            },
            Value::Timestamp {
                value: vb,
                unit: ub,
                zoned: zb,
            },
        ) => {
            if za != zoned || zb != zoned {
                return fail(path, "timestamp zone kind differs from schema".to_string());
            }
            let ca = convert_timestamp(*va, *ua, *unit, path)
                .map_err(|e| Mismatch {
                    path: path.to_string(),
                    detail: e.to_string(),
                })?;
            let cb = convert_timestamp(*vb, *ub, *unit, path)
                .map_err(|e| Mismatch {
                    path: path.to_string(),
                    detail: e.to_string(),
                })?;
            if ca == cb {
                Ok(())
            } else {
                fail(path, format!("timestamp {ca} vs {cb} at declared unit"))
            }
        }
        (LogicalType::String, Value::Str(x), Value::Str(y)) if x == y => Ok(()),
        (LogicalType::Binary, Value::Bytes(x), Value::Bytes(y)) if x == y => Ok(()),
        (LogicalType::FixedBinary { .. }, Value::Fixed(x), Value::Fixed(y)) if x == y => Ok(()),
        (LogicalType::Struct(children), Value::Struct(xs), Value::Struct(ys)) => {
            if xs.len() != children.len() || ys.len() != children.len() {
                return fail(path, "struct width differs".to_string());
            }
            for (i, child) in children.iter().enumerate() {
                values_equal(child, &xs[i], &ys[i], &format!("{path}.{}", child.name))?;
            }
            Ok(())
        }
        (LogicalType::List { element }, Value::List(xs), Value::List(ys)) => {
            if xs.len() != ys.len() {
                return fail(path, format!("list length {} vs {}", xs.len(), ys.len()));
            }
            for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                values_equal(element, x, y, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }
        (LogicalType::Map { key, value }, Value::Map(xs), Value::Map(ys)) => {
            map_entries_equal(key, value, xs, ys, path)
        }
        (_, va, vb) => fail(path, format!("{} vs {}", va.kind(), vb.kind())),
    }
}

/// Unordered multiset comparison over (key, value) entries. Every entry
/// of `a` must consume a distinct entry of `b`, so duplicate keys are
/// not collapsed.
fn map_entries_equal(
    key: &Field,
    value: &Field,
    a: &[(Value, Value)],
    b: &[(Value, Value)],
    path: &str,
) -> Result<(), Mismatch> {
    if a.len() != b.len() {
        return fail(path, format!("map size {} vs {}", a.len(), b.len()));
    }
    let mut used = vec![false; b.len()];
    for (i, (ka, va)) in a.iter().enumerate() {
        let entry_path = format!("{path}{{{i}}}");
        let mut matched = false;
        for (j, (kb, vb)) in b.iter().enumerate() {
            if used[j] {
                continue;
            }
            if values_equal(key, ka, kb, &entry_path).is_ok()
                && values_equal(value, va, vb, &entry_path).is_ok()
            {
                used[j] = true;
                matched = true;
                break;
            }
        }
        if !matched {
            return fail(&entry_path, "no matching map entry".to_string());
        }
    }
    Ok(())
}
