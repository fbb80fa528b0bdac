use crate::schema::physical::{ColumnNode, NodeKind, PhysicalSchema, PhysicalType};

#[test]
fn fixed_widths() {
    assert_eq!(PhysicalType::Bool.fixed_width(), Some(1));
    assert_eq!(PhysicalType::I32.fixed_width(), Some(4));
    assert_eq!(PhysicalType::F32.fixed_width(), Some(4));
    assert_eq!(PhysicalType::I64.fixed_width(), Some(8));
    assert_eq!(PhysicalType::F64.fixed_width(), Some(8));
    assert_eq!(PhysicalType::Bytes.fixed_width(), None);
    assert_eq!(PhysicalType::FixedBytes(7).fixed_width(), Some(7));
    assert_eq!(PhysicalType::I128(9).fixed_width(), Some(9));
}

#[test]
fn booleans_are_not_dictionary_eligible() {
    assert!(!PhysicalType::Bool.dictionary_eligible());
    assert!(PhysicalType::Bytes.dictionary_eligible());
    assert!(PhysicalType::I128(16).dictionary_eligible());
}

fn leaf(id: i32, name: &str) -> ColumnNode {
    ColumnNode {
        field_id: id,
        name: name.to_string(),
        nullable: true,
        def_level: 1,
        rep_level: 0,
        kind: NodeKind::Leaf {
            phys: PhysicalType::I64,
            logical: crate::schema::logical::LogicalType::Int64,
        },
    }
}

#[test]
fn leaf_count_walks_groups() {
    let map = ColumnNode {
        field_id: 3,
        name: "m".to_string(),
        nullable: true,
        def_level: 1,
        rep_level: 0,
        kind: NodeKind::Map {
            key: Box::new(leaf(4, "key")),
            value: Box::new(leaf(5, "value")),
        },
    };
    let schema = PhysicalSchema {
        columns: vec![
            leaf(1, "a"),
            ColumnNode {
                field_id: 2,
                name: "s".to_string(),
                nullable: false,
                def_level: 0,
                rep_level: 0,
                kind: NodeKind::Struct {
                    children: vec![leaf(6, "x"), map],
                },
            },
        ],
    };
    assert_eq!(schema.leaf_count(), 4);
}

#[test]
fn validation_accepts_a_well_formed_schema() {
    let schema = PhysicalSchema {
        columns: vec![
            leaf(1, "a"),
            ColumnNode {
                field_id: 2,
                name: "s".to_string(),
                nullable: false,
                def_level: 0,
                rep_level: 0,
                kind: NodeKind::Struct {
                    children: vec![leaf(3, "x")],
                },
            },
        ],
    };
    assert!(schema.validate().is_ok());
}

#[test]
fn validation_rejects_degenerate_storage_widths() {
    let mut bad = leaf(1, "fx");
    bad.kind = NodeKind::Leaf {
        phys: PhysicalType::FixedBytes(0),
        logical: crate::schema::logical::LogicalType::FixedBinary { len: 0 },
    };
    let schema = PhysicalSchema { columns: vec![bad] };
    assert!(schema.validate().is_err());

    let mut bad = leaf(1, "d");
    bad.kind = NodeKind::Leaf {
        phys: PhysicalType::I128(17),
        logical: crate::schema::logical::LogicalType::Decimal {
            precision: 38,
            scale: 0,
        },
    };
    let schema = PhysicalSchema { columns: vec![bad] };
    assert!(schema.validate().is_err());
}

#[test]
fn physical_schema_bincode_roundtrip() {
    let schema = PhysicalSchema {
        columns: vec![leaf(1, "a")],
    };
    let bytes = bincode::serialize(&schema).expect("serialize");
    let back: PhysicalSchema = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(back, schema);
}
