use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::schema::logical::LogicalType;

/// Storage-oriented value type. Widths are exact: a column persisted as
/// `I32` occupies four little-endian bytes per present value, never more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicalType {
    Bool,
    I32,
    I64,
    F32,
    F64,
    /// Variable length: u32 length prefix + payload.
    Bytes,
    /// Exactly `n` bytes per value.
    FixedBytes(usize),
    /// Wide decimal storage: `n`-byte little-endian two's complement.
    I128(usize),
}

impl PhysicalType {
    /// Bytes per value for fixed-width types, `None` for `Bytes`.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            PhysicalType::Bool => Some(1),
            PhysicalType::I32 | PhysicalType::F32 => Some(4),
            PhysicalType::I64 | PhysicalType::F64 => Some(8),
            PhysicalType::Bytes => None,
            PhysicalType::FixedBytes(n) | PhysicalType::I128(n) => Some(*n),
        }
    }

    /// Booleans gain nothing from a code table; everything else may
    /// start out dictionary-encoded.
    pub fn dictionary_eligible(&self) -> bool {
        !matches!(self, PhysicalType::Bool)
    }
}

/// One node of the persisted physical schema. Definition and repetition
/// levels are the maxima reachable at this node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNode {
    pub field_id: i32,
    pub name: String,
    pub nullable: bool,
    pub def_level: u16,
    pub rep_level: u16,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf {
        phys: PhysicalType,
        logical: LogicalType,
    },
    Struct {
        children: Vec<ColumnNode>,
    },
    List {
        element: Box<ColumnNode>,
    },
    Map {
        key: Box<ColumnNode>,
        value: Box<ColumnNode>,
    },
}

impl ColumnNode {
    /// Number of leaf columns beneath (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Struct { children } => children.iter().map(|c| c.leaf_count()).sum(),
            NodeKind::List { element } => element.leaf_count(),
            NodeKind::Map { key, value } => key.leaf_count() + value.leaf_count(),
        }
    }
}

/// The artifact actually persisted alongside column data. Readers are
/// built from this, never from the caller's logical schema object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSchema {
    pub columns: Vec<ColumnNode>,
}

impl PhysicalSchema {
    pub fn leaf_count(&self) -> usize {
        self.columns.iter().map(|c| c.leaf_count()).sum()
    }

    /// Structural sanity of a deserialized schema. Blob metadata is
    /// untrusted input; a schema that fails here is corruption, not a
    /// caller error.
    pub fn validate(&self) -> Result<(), CodecError> {
        for column in &self.columns {
            validate_node(column)?;
        }
        Ok(())
    }
}

fn validate_node(node: &ColumnNode) -> Result<(), CodecError> {
    match &node.kind {
        NodeKind::Leaf { phys, .. } => match phys {
            PhysicalType::FixedBytes(0) => Err(CodecError::CorruptData(format!(
                "{}: zero-width fixed-bytes storage in persisted schema",
                node.name
            ))),
            PhysicalType::I128(n) if !(1..=16).contains(n) => {
                Err(CodecError::CorruptData(format!(
                    "{}: wide integer storage width {n} outside 1..=16",
                    node.name
                )))
            }
            _ => Ok(()),
        },
        NodeKind::Struct { children } => {
            if children.is_empty() {
                return Err(CodecError::CorruptData(format!(
                    "{}: struct node with no children in persisted schema",
                    node.name
                )));
            }
            for child in children {
                validate_node(child)?;
            }
            Ok(())
        }
        NodeKind::List { element } => validate_node(element),
        NodeKind::Map { key, value } => {
            validate_node(key)?;
            validate_node(value)
        }
    }
}
