use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::CodecError;

/// Timestamp resolution. `Nanos` needs the full i64 range; conversions
/// between units are checked, never truncating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    /// Nanoseconds per one unit of this resolution.
    pub fn nanos_per_unit(self) -> i64 {
        match self {
            TimeUnit::Millis => 1_000_000,
            TimeUnit::Micros => 1_000,
            TimeUnit::Nanos => 1,
        }
    }
}

/// Closed set of logical value types the codec understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal { precision: u8, scale: u8 },
    /// Days since the Unix epoch.
    Date,
    /// Microseconds since midnight.
    Time,
    Timestamp { unit: TimeUnit, zoned: bool },
    String,
    Binary,
    FixedBinary { len: usize },
    Struct(Vec<Field>),
    List { element: Box<Field> },
    Map { key: Box<Field>, value: Box<Field> },
    /// A value-less variant type; columns of this type are always null.
    Unknown,
}

impl LogicalType {
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            LogicalType::Struct(_) | LogicalType::List { .. } | LogicalType::Map { .. }
        )
    }
}

/// One named, id-stable schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: i32,
    pub name: String,
    pub nullable: bool,
    pub ty: LogicalType,
}

impl Field {
    pub fn required(id: i32, name: &str, ty: LogicalType) -> Self {
        Self {
            id,
            name: name.to_string(),
            nullable: false,
            ty,
        }
    }

    pub fn optional(id: i32, name: &str, ty: LogicalType) -> Self {
        Self {
            id,
            name: name.to_string(),
            nullable: true,
            ty,
        }
    }
}

/// An ordered sequence of fields with unique, stable ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Validates id uniqueness (recursively) and structural rules:
    /// map keys must be non-nullable, `Unknown` fields must be nullable,
    /// structs must carry at least one field.
    pub fn new(fields: Vec<Field>) -> Result<Self, CodecError> {
        let mut seen = HashSet::new();
        for field in &fields {
            validate_field(field, &mut seen)?;
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

fn validate_field(field: &Field, seen: &mut HashSet<i32>) -> Result<(), CodecError> {
    if !seen.insert(field.id) {
        return Err(CodecError::InvalidSchema(format!(
            "duplicate field id {} ({})",
            field.id, field.name
        )));
    }
    match &field.ty {
        LogicalType::Unknown => {
            if !field.nullable {
                return Err(CodecError::InvalidSchema(format!(
                    "unknown-typed field {} must be nullable",
                    field.name
                )));
            }
        }
        LogicalType::Struct(children) => {
            if children.is_empty() {
                return Err(CodecError::InvalidSchema(format!(
                    "struct field {} has no children",
                    field.name
                )));
            }
            for child in children {
                validate_field(child, seen)?;
            }
        }
        LogicalType::List { element } => validate_field(element, seen)?,
        LogicalType::Map { key, value } => {
            if key.nullable {
                return Err(CodecError::InvalidSchema(format!(
                    "map field {} declares a nullable key",
                    field.name
                )));
            }
            validate_field(key, seen)?;
            validate_field(value, seen)?;
        }
        _ => {}
    }
    Ok(())
}
