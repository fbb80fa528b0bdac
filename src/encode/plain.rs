use crate::errors::CodecError;
use crate::schema::logical::LogicalType;
use crate::schema::mapper::max_unscaled;
use crate::schema::physical::PhysicalType;
use crate::value::{Value, convert_timestamp};

/// Encodes one present value at the exact byte width and endianness the
/// physical mapping implies. Variable-length values carry a u32 length
/// prefix; everything is little-endian.
///
/// Shape disagreements raise `SchemaMismatch`; values that do not fit
/// their physical width raise `PrecisionLoss`, never a silent truncation.
pub fn encode_value(
    logical: &LogicalType,
    phys: PhysicalType,
    value: &Value,
    path: &str,
) -> Result<Vec<u8>, CodecError> {
    match (logical, value) {
        (LogicalType::Boolean, Value::Bool(b)) => Ok(vec![u8::from(*b)]),
        (LogicalType::Int32, Value::I32(v)) => Ok(v.to_le_bytes().to_vec()),
        (LogicalType::Date, Value::Date(v)) => Ok(v.to_le_bytes().to_vec()),
        (LogicalType::Int64, Value::I64(v)) => Ok(v.to_le_bytes().to_vec()),
        (LogicalType::Time, Value::Time(v)) => Ok(v.to_le_bytes().to_vec()),
        (LogicalType::Float32, Value::F32(v)) => Ok(v.to_le_bytes().to_vec()),
        (LogicalType::Float64, Value::F64(v)) => Ok(v.to_le_bytes().to_vec()),
        (
            LogicalType::Decimal { precision, scale },
            Value::Decimal {
                unscaled,
                scale: vscale,
                ..
            },
        ) => {
            if vscale != scale {
                return Err(CodecError::mismatch(
                    path,
                    format!("decimal scale {vscale} does not match declared {scale}"),
                ));
            }
            if unscaled.abs() > max_unscaled(*precision) {
                return Err(CodecError::precision(
                    path,
                    format!("unscaled {unscaled} exceeds precision {precision}"),
                ));
            }
            encode_unscaled(*unscaled, phys, path)
        }
        (
            LogicalType::Timestamp { unit, zoned },
            Value::Timestamp {
                value: ts,
                unit: vunit,
                zoned: vzoned,
            },
        ) => {
            if vzoned != zoned {
                return Err(CodecError::mismatch(
                    path,
                    "timestamp zone kind does not match schema",
                ));
            }
            let converted = convert_timestamp(*ts, *vunit, *unit, path)?;
            Ok(converted.to_le_bytes().to_vec())
        }
        (LogicalType::String, Value::Str(s)) => {
            let mut out = Vec::with_capacity(4 + s.len());
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
            Ok(out)
        }
        (LogicalType::Binary, Value::Bytes(b)) => {
            let mut out = Vec::with_capacity(4 + b.len());
            out.extend_from_slice(&(b.len() as u32).to_le_bytes());
            out.extend_from_slice(b);
            Ok(out)
        }
        (LogicalType::FixedBinary { len }, Value::Fixed(b)) => {
            if b.len() != *len {
                return Err(CodecError::mismatch(
                    path,
                    format!("fixed binary has {} bytes, declared {len}", b.len()),
                ));
            }
            Ok(b.clone())
        }
        (LogicalType::Unknown, v) => Err(CodecError::mismatch(
            path,
            format!("unknown-typed column cannot hold a {} value", v.kind()),
        )),
        (lt, v) => Err(CodecError::mismatch(
            path,
            format!("{} value written to {lt:?} column", v.kind()),
        )),
    }
}

fn encode_unscaled(unscaled: i128, phys: PhysicalType, path: &str) -> Result<Vec<u8>, CodecError> {
    match phys {
        PhysicalType::I32 => {
            let v = i32::try_from(unscaled).map_err(|_| {
                CodecError::precision(path, format!("unscaled {unscaled} does not fit i32 storage"))
            })?;
            Ok(v.to_le_bytes().to_vec())
        }
        PhysicalType::I64 => {
            let v = i64::try_from(unscaled).map_err(|_| {
                CodecError::precision(path, format!("unscaled {unscaled} does not fit i64 storage"))
            })?;
            Ok(v.to_le_bytes().to_vec())
        }
        PhysicalType::I128(n) => {
            // n-byte little-endian two's complement, sign bits dropped
            // only where they are pure extension.
            let full = unscaled.to_le_bytes();
            let ext = if unscaled < 0 { 0xFF } else { 0x00 };
            for &b in &full[n..] {
                if b != ext {
                    return Err(CodecError::precision(
                        path,
                        format!("unscaled {unscaled} does not fit {n}-byte storage"),
                    ));
                }
            }
            // The top retained bit must agree with the sign.
            if n < 16 && (full[n - 1] & 0x80 != 0) != (unscaled < 0) {
                return Err(CodecError::precision(
                    path,
                    format!("unscaled {unscaled} does not fit {n}-byte storage"),
                ));
            }
            Ok(full[..n].to_vec())
        }
        other => Err(CodecError::mismatch(
            path,
            format!("decimal mapped to non-integer storage {other:?}"),
        )),
    }
}
