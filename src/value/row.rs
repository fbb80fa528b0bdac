use crate::value::Value;

/// Read side of the row coupling: ordered, schema-indexed getters.
/// The codec never sees how a caller's row packs its fields.
pub trait RowAccess {
    fn width(&self) -> usize;
    fn get(&self, pos: usize) -> &Value;
}

/// Build side of the row coupling: ordered, schema-indexed setters
/// yielding a finished row.
pub trait RowBuild {
    type Out;

    fn set(&mut self, pos: usize, value: Value);
    fn finish(self) -> Self::Out;
}

/// The crate's own row type: a positional bag of values, immutable once
/// constructed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl RowAccess for Row {
    fn width(&self) -> usize {
        self.values.len()
    }

    fn get(&self, pos: usize) -> &Value {
        &self.values[pos]
    }
}

/// Positional builder used by the reader tree.
#[derive(Debug)]
pub struct RowBuilder {
    values: Vec<Value>,
}

impl RowBuilder {
    pub fn with_width(width: usize) -> Self {
        Self {
            values: vec![Value::Null; width],
        }
    }
}

impl RowBuild for RowBuilder {
    type Out = Row;

    fn set(&mut self, pos: usize, value: Value) {
        self.values[pos] = value;
    }

    fn finish(self) -> Row {
        Row::new(self.values)
    }
}
