use crate::errors::CodecError;
use crate::schema::logical::{Field, LogicalType, Schema};
use crate::schema::physical::{ColumnNode, NodeKind, PhysicalSchema, PhysicalType};

pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Maps a logical schema onto its physical column layout.
///
/// Pure and deterministic: a depth-first traversal that increments the
/// definition level at every optional node and the repetition level at
/// every repeated (list/map entry) node. Decimals land in the smallest
/// storage that preserves the declared precision.
pub fn map_schema(schema: &Schema) -> Result<PhysicalSchema, CodecError> {
    let columns = schema
        .fields()
        .iter()
        .map(|f| map_field(f, 0, 0))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PhysicalSchema { columns })
}

fn map_field(field: &Field, def: u16, rep: u16) -> Result<ColumnNode, CodecError> {
    let def_here = def + u16::from(field.nullable);
    let kind = match &field.ty {
        LogicalType::Struct(children) => {
            let mapped = children
                .iter()
                .map(|c| map_field(c, def_here, rep))
                .collect::<Result<Vec<_>, _>>()?;
            NodeKind::Struct { children: mapped }
        }
        // An element occurrence adds one definition level ("list is
        // non-empty") and one repetition level.
        LogicalType::List { element } => NodeKind::List {
            element: Box::new(map_field(element, def_here + 1, rep + 1)?),
        },
        LogicalType::Map { key, value } => NodeKind::Map {
            key: Box::new(map_field(key, def_here + 1, rep + 1)?),
            value: Box::new(map_field(value, def_here + 1, rep + 1)?),
        },
        other => NodeKind::Leaf {
            phys: leaf_physical(other, &field.name)?,
            logical: other.clone(),
        },
    };
    Ok(ColumnNode {
        field_id: field.id,
        name: field.name.clone(),
        nullable: field.nullable,
        def_level: def_here,
        rep_level: rep,
        kind,
    })
}

fn leaf_physical(ty: &LogicalType, name: &str) -> Result<PhysicalType, CodecError> {
    match ty {
        LogicalType::Boolean => Ok(PhysicalType::Bool),
        LogicalType::Int32 => Ok(PhysicalType::I32),
        LogicalType::Int64 => Ok(PhysicalType::I64),
        LogicalType::Float32 => Ok(PhysicalType::F32),
        LogicalType::Float64 => Ok(PhysicalType::F64),
        LogicalType::Date => Ok(PhysicalType::I32),
        LogicalType::Time => Ok(PhysicalType::I64),
        LogicalType::Timestamp { .. } => Ok(PhysicalType::I64),
        LogicalType::String | LogicalType::Binary => Ok(PhysicalType::Bytes),
        LogicalType::FixedBinary { len } => {
            if *len == 0 {
                return Err(CodecError::UnsupportedType(format!(
                    "zero-length fixed binary ({name})"
                )));
            }
            Ok(PhysicalType::FixedBytes(*len))
        }
        LogicalType::Decimal { precision, scale } => {
            decimal_physical(*precision, *scale, name)
        }
        // Unknown columns persist levels only; the phys slot is never
        // used for data but must still be a concrete width.
        LogicalType::Unknown => Ok(PhysicalType::Bytes),
        LogicalType::Struct(_) | LogicalType::List { .. } | LogicalType::Map { .. } => {
            unreachable!("nested types are mapped as group nodes")
        }
    }
}

fn decimal_physical(precision: u8, scale: u8, name: &str) -> Result<PhysicalType, CodecError> {
    if precision == 0 || precision > MAX_DECIMAL_PRECISION {
        return Err(CodecError::UnsupportedType(format!(
            "decimal precision {precision} out of range 1..={MAX_DECIMAL_PRECISION} ({name})"
        )));
    }
    if scale > precision {
        return Err(CodecError::UnsupportedType(format!(
            "decimal scale {scale} exceeds precision {precision} ({name})"
        )));
    }
    if precision <= 9 {
        Ok(PhysicalType::I32)
    } else if precision <= 18 {
        Ok(PhysicalType::I64)
    } else {
        Ok(PhysicalType::I128(decimal_byte_len(precision)))
    }
}

/// Smallest signed byte width that can hold any unscaled value of the
/// given precision.
pub fn decimal_byte_len(precision: u8) -> usize {
    let max = max_unscaled(precision);
    for n in 1..=16usize {
        if n == 16 {
            return 16;
        }
        let bound = (1i128 << (8 * n - 1)) - 1;
        if max <= bound {
            return n;
        }
    }
    16
}

/// 10^precision - 1, the largest unscaled magnitude the precision admits.
pub fn max_unscaled(precision: u8) -> i128 {
    let mut v: i128 = 1;
    for _ in 0..precision {
        v *= 10;
    }
    v - 1
}
