use crate::config::CodecConfig;
use crate::encode::column::{ColumnBuffer, ColumnChunk};
use crate::encode::plain::encode_value;
use crate::errors::CodecError;
use crate::schema::logical::LogicalType;
use crate::schema::physical::{ColumnNode, NodeKind, PhysicalType};
use crate::value::Value;

/// One writer per physical column node, composed by schema shape.
///
/// A closed sum type rather than dyn dispatch: every logical type
/// category has exactly one shape here, and adding a category forces the
/// match arms to be revisited.
#[derive(Debug)]
pub enum ValueWriter {
    Leaf(LeafWriter),
    Struct(StructWriter),
    List(ListWriter),
    Map(MapWriter),
}

#[derive(Debug)]
pub struct LeafWriter {
    column: ColumnBuffer,
    phys: PhysicalType,
    logical: LogicalType,
    nullable: bool,
    def_level: u16,
    path: String,
}

#[derive(Debug)]
pub struct StructWriter {
    nullable: bool,
    def_level: u16,
    fields: Vec<ValueWriter>,
    path: String,
}

#[derive(Debug)]
pub struct ListWriter {
    nullable: bool,
    def_level: u16,
    element_rep: u16,
    element: Box<ValueWriter>,
    path: String,
}

#[derive(Debug)]
pub struct MapWriter {
    nullable: bool,
    def_level: u16,
    entry_rep: u16,
    key: Box<ValueWriter>,
    value: Box<ValueWriter>,
    path: String,
}

impl ValueWriter {
    pub fn build(node: &ColumnNode, config: &CodecConfig, parent_path: &str) -> ValueWriter {
        let path = if parent_path.is_empty() {
            node.name.clone()
        } else {
            format!("{parent_path}.{}", node.name)
        };
        match &node.kind {
            NodeKind::Leaf { phys, logical } => ValueWriter::Leaf(LeafWriter {
                column: ColumnBuffer::new(&path, *phys, config),
                phys: *phys,
                logical: logical.clone(),
                nullable: node.nullable,
                def_level: node.def_level,
                path,
            }),
            NodeKind::Struct { children } => ValueWriter::Struct(StructWriter {
                nullable: node.nullable,
                def_level: node.def_level,
                fields: children
                    .iter()
                    .map(|c| ValueWriter::build(c, config, &path))
                    .collect(),
                path,
            }),
            NodeKind::List { element } => ValueWriter::List(ListWriter {
                nullable: node.nullable,
                def_level: node.def_level,
                element_rep: element.rep_level,
                element: Box::new(ValueWriter::build(element, config, &path)),
                path,
            }),
            NodeKind::Map { key, value } => ValueWriter::Map(MapWriter {
                nullable: node.nullable,
                def_level: node.def_level,
                entry_rep: key.rep_level,
                key: Box::new(ValueWriter::build(key, config, &path)),
                value: Box::new(ValueWriter::build(value, config, &path)),
                path,
            }),
        }
    }

    /// Writes one value. `rep` is the repetition level this entry opens
    /// at; `def` is the definition level established by the ancestors.
    pub fn write(&mut self, value: &Value, rep: u16, def: u16) -> Result<(), CodecError> {
        match self {
            ValueWriter::Leaf(w) => w.write(value, rep, def),
            ValueWriter::Struct(w) => w.write(value, rep, def),
            ValueWriter::List(w) => w.write(value, rep, def),
            ValueWriter::Map(w) => w.write(value, rep, def),
        }
    }

    /// Records an absent subtree: one level entry per descendant leaf.
    fn write_absent(&mut self, rep: u16, def: u16) {
        match self {
            ValueWriter::Leaf(w) => w.column.push_null(rep, def),
            ValueWriter::Struct(w) => {
                for f in &mut w.fields {
                    f.write_absent(rep, def);
                }
            }
            ValueWriter::List(w) => w.element.write_absent(rep, def),
            ValueWriter::Map(w) => {
                w.key.write_absent(rep, def);
                w.value.write_absent(rep, def);
            }
        }
    }

    /// Seals every leaf beneath this node, appending chunks in
    /// depth-first leaf order.
    pub fn finish(self, chunks: &mut Vec<ColumnChunk>) {
        match self {
            ValueWriter::Leaf(w) => chunks.push(w.column.finish()),
            ValueWriter::Struct(w) => {
                for f in w.fields {
                    f.finish(chunks);
                }
            }
            ValueWriter::List(w) => w.element.finish(chunks),
            ValueWriter::Map(w) => {
                w.key.finish(chunks);
                w.value.finish(chunks);
            }
        }
    }
}

impl LeafWriter {
    fn write(&mut self, value: &Value, rep: u16, def: u16) -> Result<(), CodecError> {
        if value.is_null() {
            if !self.nullable {
                return Err(CodecError::mismatch(
                    &self.path,
                    "null written to required column",
                ));
            }
            self.column.push_null(rep, def);
            return Ok(());
        }
        let encoded = encode_value(&self.logical, self.phys, value, &self.path)?;
        self.column.push_value(rep, self.def_level, &encoded);
        Ok(())
    }
}

impl StructWriter {
    fn write(&mut self, value: &Value, rep: u16, def: u16) -> Result<(), CodecError> {
        match value {
            Value::Null => {
                if !self.nullable {
                    return Err(CodecError::mismatch(
                        &self.path,
                        "null written to required struct",
                    ));
                }
                for f in &mut self.fields {
                    f.write_absent(rep, def);
                }
                Ok(())
            }
            Value::Struct(vals) => {
                if vals.len() != self.fields.len() {
                    return Err(CodecError::mismatch(
                        &self.path,
                        format!(
                            "struct has {} values, schema declares {}",
                            vals.len(),
                            self.fields.len()
                        ),
                    ));
                }
                for (f, v) in self.fields.iter_mut().zip(vals) {
                    f.write(v, rep, self.def_level)?;
                }
                Ok(())
            }
            other => Err(CodecError::mismatch(
                &self.path,
                format!("{} value written to struct column", other.kind()),
            )),
        }
    }
}

impl ListWriter {
    fn write(&mut self, value: &Value, rep: u16, def: u16) -> Result<(), CodecError> {
        match value {
            Value::Null => {
                if !self.nullable {
                    return Err(CodecError::mismatch(
                        &self.path,
                        "null written to required list",
                    ));
                }
                self.element.write_absent(rep, def);
                Ok(())
            }
            Value::List(elems) => {
                if elems.is_empty() {
                    // Present-but-empty: the list's own definition level
                    // without an element occurrence. Distinct from null.
                    self.element.write_absent(rep, self.def_level);
                    return Ok(());
                }
                for (i, elem) in elems.iter().enumerate() {
                    let r = if i == 0 { rep } else { self.element_rep };
                    self.element.write(elem, r, self.def_level + 1)?;
                }
                Ok(())
            }
            other => Err(CodecError::mismatch(
                &self.path,
                format!("{} value written to list column", other.kind()),
            )),
        }
    }
}

impl MapWriter {
    fn write(&mut self, value: &Value, rep: u16, def: u16) -> Result<(), CodecError> {
        match value {
            Value::Null => {
                if !self.nullable {
                    return Err(CodecError::mismatch(
                        &self.path,
                        "null written to required map",
                    ));
                }
                self.key.write_absent(rep, def);
                self.value.write_absent(rep, def);
                Ok(())
            }
            Value::Map(entries) => {
                if entries.is_empty() {
                    self.key.write_absent(rep, self.def_level);
                    self.value.write_absent(rep, self.def_level);
                    return Ok(());
                }
                for (i, (k, v)) in entries.iter().enumerate() {
                    if k.is_null() {
                        return Err(CodecError::mismatch(&self.path, "map entry has null key"));
                    }
                    let r = if i == 0 { rep } else { self.entry_rep };
                    self.key.write(k, r, self.def_level + 1)?;
                    self.value.write(v, r, self.def_level + 1)?;
                }
                Ok(())
            }
            other => Err(CodecError::mismatch(
                &self.path,
                format!("{} value written to map column", other.kind()),
            )),
        }
    }
}
