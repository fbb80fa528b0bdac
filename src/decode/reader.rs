use crate::decode::column::LeafCursor;
use crate::errors::CodecError;
use crate::schema::physical::{ColumnNode, NodeKind, PhysicalSchema};
use crate::value::row::{Row, RowBuild, RowBuilder};
use crate::value::Value;

/// Reader-side mirror of the writer tree, built from the persisted
/// physical schema only. Consulting definition levels decides present
/// vs. null; repetition levels delimit list/map elements.
#[derive(Debug)]
pub enum ValueReader {
    Leaf(LeafReader),
    Struct(StructReader),
    List(ListReader),
    Map(MapReader),
}

#[derive(Debug)]
pub struct LeafReader {
    cursor: LeafCursor,
    nullable: bool,
    path: String,
}

#[derive(Debug)]
pub struct StructReader {
    nullable: bool,
    def_level: u16,
    fields: Vec<ValueReader>,
    path: String,
}

#[derive(Debug)]
pub struct ListReader {
    nullable: bool,
    def_level: u16,
    element_rep: u16,
    element: Box<ValueReader>,
    path: String,
}

#[derive(Debug)]
pub struct MapReader {
    nullable: bool,
    def_level: u16,
    entry_rep: u16,
    key: Box<ValueReader>,
    value: Box<ValueReader>,
    path: String,
}

type ChunkIter = std::vec::IntoIter<(Option<Vec<u8>>, Vec<u8>)>;

impl ValueReader {
    /// Builds the reader for one column subtree, consuming leaf chunks
    /// in depth-first order.
    pub fn build(
        node: &ColumnNode,
        chunks: &mut ChunkIter,
        parent_path: &str,
    ) -> Result<ValueReader, CodecError> {
        let path = if parent_path.is_empty() {
            node.name.clone()
        } else {
            format!("{parent_path}.{}", node.name)
        };
        match &node.kind {
            NodeKind::Leaf { phys, logical } => {
                let (dict_page, pages) = chunks.next().ok_or_else(|| {
                    CodecError::CorruptData(format!(
                        "{path}: chunk directory has fewer entries than schema leaves"
                    ))
                })?;
                Ok(ValueReader::Leaf(LeafReader {
                    cursor: LeafCursor::new(
                        *phys,
                        logical.clone(),
                        node.def_level,
                        path.clone(),
                        dict_page,
                        pages,
                    )?,
                    nullable: node.nullable,
                    path,
                }))
            }
            NodeKind::Struct { children } => {
                let fields = children
                    .iter()
                    .map(|c| ValueReader::build(c, chunks, &path))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ValueReader::Struct(StructReader {
                    nullable: node.nullable,
                    def_level: node.def_level,
                    fields,
                    path,
                }))
            }
            NodeKind::List { element } => Ok(ValueReader::List(ListReader {
                nullable: node.nullable,
                def_level: node.def_level,
                element_rep: element.rep_level,
                element: Box::new(ValueReader::build(element, chunks, &path)?),
                path,
            })),
            NodeKind::Map { key, value } => Ok(ValueReader::Map(MapReader {
                nullable: node.nullable,
                def_level: node.def_level,
                entry_rep: key.rep_level,
                key: Box::new(ValueReader::build(key, chunks, &path)?),
                value: Box::new(ValueReader::build(value, chunks, &path)?),
                path,
            })),
        }
    }

    /// Levels of the next entry, taken from the subtree's first leaf.
    fn peek_levels(&mut self) -> Result<Option<(u16, u16)>, CodecError> {
        match self {
            ValueReader::Leaf(r) => r.cursor.peek(),
            ValueReader::Struct(r) => r.fields[0].peek_levels(),
            ValueReader::List(r) => r.element.peek_levels(),
            ValueReader::Map(r) => r.key.peek_levels(),
        }
    }

    /// Consumes the single entry an absent subtree occupies in every
    /// descendant leaf.
    fn advance_absent(&mut self) -> Result<(), CodecError> {
        match self {
            ValueReader::Leaf(r) => {
                let (_, _, value) = r.cursor.next_entry()?;
                if value.is_some() {
                    return Err(CodecError::CorruptData(format!(
                        "{}: present value where an absent subtree was recorded",
                        r.path
                    )));
                }
                Ok(())
            }
            ValueReader::Struct(r) => {
                for f in &mut r.fields {
                    f.advance_absent()?;
                }
                Ok(())
            }
            ValueReader::List(r) => r.element.advance_absent(),
            ValueReader::Map(r) => {
                r.key.advance_absent()?;
                r.value.advance_absent()
            }
        }
    }

    /// Reconstructs one value. Callers guarantee every ancestor is
    /// present; definition levels below that are structural corruption.
    fn read(&mut self) -> Result<Value, CodecError> {
        match self {
            ValueReader::Leaf(r) => r.read(),
            ValueReader::Struct(_) => self.read_struct(),
            ValueReader::List(_) => self.read_list(),
            ValueReader::Map(_) => self.read_map(),
        }
    }

    fn read_struct(&mut self) -> Result<Value, CodecError> {
        let ValueReader::Struct(r) = self else {
            unreachable!()
        };
        if r.nullable {
            let Some((_, def)) = r.fields[0].peek_levels()? else {
                return Err(CodecError::CorruptData(format!(
                    "{}: column stream exhausted mid-record",
                    r.path
                )));
            };
            if def < r.def_level {
                for f in &mut r.fields {
                    f.advance_absent()?;
                }
                return Ok(Value::Null);
            }
        }
        let mut vals = Vec::with_capacity(r.fields.len());
        for f in &mut r.fields {
            vals.push(f.read()?);
        }
        Ok(Value::Struct(vals))
    }

    fn read_list(&mut self) -> Result<Value, CodecError> {
        let ValueReader::List(r) = self else {
            unreachable!()
        };
        let Some((_, def)) = r.element.peek_levels()? else {
            return Err(CodecError::CorruptData(format!(
                "{}: column stream exhausted mid-record",
                r.path
            )));
        };
        if def < r.def_level {
            if !r.nullable {
                return Err(CodecError::CorruptData(format!(
                    "{}: definition level {def} below required list presence {}",
                    r.path, r.def_level
                )));
            }
            r.element.advance_absent()?;
            return Ok(Value::Null);
        }
        if def == r.def_level {
            // Present but empty; the entry carries the list's own level
            // and no element.
            r.element.advance_absent()?;
            return Ok(Value::List(Vec::new()));
        }
        let mut elems = vec![r.element.read()?];
        loop {
            match r.element.peek_levels()? {
                Some((rep, _)) if rep == r.element_rep => elems.push(r.element.read()?),
                Some((rep, _)) if rep > r.element_rep => {
                    return Err(CodecError::CorruptData(format!(
                        "{}: repetition level {rep} continues a sequence no element opened",
                        r.path
                    )));
                }
                _ => break,
            }
        }
        Ok(Value::List(elems))
    }

    fn read_map(&mut self) -> Result<Value, CodecError> {
        let ValueReader::Map(r) = self else {
            unreachable!()
        };
        let Some((_, def)) = r.key.peek_levels()? else {
            return Err(CodecError::CorruptData(format!(
                "{}: column stream exhausted mid-record",
                r.path
            )));
        };
        if def < r.def_level {
            if !r.nullable {
                return Err(CodecError::CorruptData(format!(
                    "{}: definition level {def} below required map presence {}",
                    r.path, r.def_level
                )));
            }
            r.key.advance_absent()?;
            r.value.advance_absent()?;
            return Ok(Value::Null);
        }
        if def == r.def_level {
            r.key.advance_absent()?;
            r.value.advance_absent()?;
            return Ok(Value::Map(Vec::new()));
        }
        let mut entries = vec![(r.key.read()?, r.value.read()?)];
        loop {
            match r.key.peek_levels()? {
                Some((rep, _)) if rep == r.entry_rep => {
                    entries.push((r.key.read()?, r.value.read()?));
                }
                Some((rep, _)) if rep > r.entry_rep => {
                    return Err(CodecError::CorruptData(format!(
                        "{}: repetition level {rep} continues a sequence no entry opened",
                        r.path
                    )));
                }
                _ => break,
            }
        }
        Ok(Value::Map(entries))
    }

    fn exhausted(&mut self) -> Result<bool, CodecError> {
        match self {
            ValueReader::Leaf(r) => r.cursor.exhausted(),
            ValueReader::Struct(r) => {
                for f in &mut r.fields {
                    if !f.exhausted()? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ValueReader::List(r) => r.element.exhausted(),
            ValueReader::Map(r) => Ok(r.key.exhausted()? && r.value.exhausted()?),
        }
    }
}

impl LeafReader {
    fn read(&mut self) -> Result<Value, CodecError> {
        let (_, def, value) = self.cursor.next_entry()?;
        match value {
            Some(v) => Ok(v),
            None => {
                if self.nullable && def + 1 == self.cursor.max_def() {
                    Ok(Value::Null)
                } else {
                    Err(CodecError::CorruptData(format!(
                        "{}: definition level {def} invalid under present ancestors (max {})",
                        self.path,
                        self.cursor.max_def()
                    )))
                }
            }
        }
    }
}

/// Lazy, finite, single-pass sequence of decoded rows. Yields exactly
/// the persisted row count, then `None`; trailing column data past that
/// count is corruption, never extra rows.
#[derive(Debug)]
pub struct RowCursor {
    fields: Vec<ValueReader>,
    remaining: u64,
}

impl RowCursor {
    pub fn new(
        schema: &PhysicalSchema,
        chunks: Vec<(Option<Vec<u8>>, Vec<u8>)>,
        row_count: u64,
    ) -> Result<Self, CodecError> {
        let mut iter = chunks.into_iter();
        let fields = schema
            .columns
            .iter()
            .map(|c| ValueReader::build(c, &mut iter, ""))
            .collect::<Result<Vec<_>, _>>()?;
        if iter.next().is_some() {
            return Err(CodecError::CorruptData(
                "chunk directory has more entries than schema leaves".to_string(),
            ));
        }
        Ok(Self {
            fields,
            remaining: row_count,
        })
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn read_next(&mut self) -> Result<Option<Row>, CodecError> {
        if self.remaining == 0 {
            for f in &mut self.fields {
                if !f.exhausted()? {
                    return Err(CodecError::CorruptData(
                        "column data remains past the recorded row count".to_string(),
                    ));
                }
            }
            return Ok(None);
        }
        let mut builder = RowBuilder::with_width(self.fields.len());
        for (i, f) in self.fields.iter_mut().enumerate() {
            match f.peek_levels()? {
                None => {
                    return Err(CodecError::CorruptData(
                        "column stream exhausted before the recorded row count".to_string(),
                    ));
                }
                Some((rep, _)) if rep != 0 => {
                    return Err(CodecError::CorruptData(format!(
                        "record begins at repetition level {rep}: continuation with no preceding element start"
                    )));
                }
                Some(_) => {}
            }
            builder.set(i, f.read()?);
        }
        self.remaining -= 1;
        Ok(Some(builder.finish()))
    }
}
