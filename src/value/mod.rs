pub mod equality;
pub mod row;

pub use equality::{Mismatch, rows_logically_equal};
pub use row::{Row, RowAccess, RowBuild, RowBuilder};

use crate::errors::CodecError;
use crate::schema::logical::TimeUnit;


/// A single typed cell. Nested containers hold further values; `Null`
/// stands in at any optional position.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal {
        unscaled: i128,
        precision: u8,
        scale: u8,
    },
    /// Days since the Unix epoch.
    Date(i32),
    /// Microseconds since midnight.
    Time(i64),
    Timestamp {
        value: i64,
        unit: TimeUnit,
        zoned: bool,
    },
    Str(String),
    Bytes(Vec<u8>),
    Fixed(Vec<u8>),
    Struct(Vec<Value>),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short tag for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::F32(_) => "float32",
            Value::F64(_) => "float64",
            Value::Decimal { .. } => "decimal",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp { .. } => "timestamp",
            Value::Str(_) => "string",
            Value::Bytes(_) => "binary",
            Value::Fixed(_) => "fixed",
            Value::Struct(_) => "struct",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// Converts a timestamp between resolutions without ever truncating.
///
/// Narrowing (nanos -> millis) fails unless the value is exactly
/// representable; widening fails on i64 overflow.
pub fn convert_timestamp(
    value: i64,
    from: TimeUnit,
    to: TimeUnit,
    path: &str,
) -> Result<i64, CodecError> {
    if from == to {
        return Ok(value);
    }
    let from_nanos = from.nanos_per_unit();
    let to_nanos = to.nanos_per_unit();
    if from_nanos > to_nanos {
        // Widening, e.g. millis -> nanos.
        let factor = from_nanos / to_nanos;
        value.checked_mul(factor).ok_or_else(|| {
            CodecError::precision(
                path,
                format!("timestamp {value} overflows when widened to {to:?}"),
            )
        })
    } else {
        let factor = to_nanos / from_nanos;
        if value % factor != 0 {
            return Err(CodecError::precision(
                path,
                format!("timestamp {value} ({from:?}) not representable at {to:?}"),
            ));
        }
        Ok(value / factor)
    }
}
