use std::collections::VecDeque;

use crate::decode::pages::{decode_dict_page, decode_page};
use crate::errors::CodecError;
use crate::schema::logical::LogicalType;
use crate::schema::physical::PhysicalType;
use crate::value::Value;

/// Forward-only cursor over one leaf column's chunk.
///
/// Pages are decoded lazily, one at a time; the dictionary page (when the
/// chunk has one) is decoded up front so codes resolve without a second
/// pass. Non-restartable by construction: entries are consumed in order.
#[derive(Debug)]
pub struct LeafCursor {
    phys: PhysicalType,
    logical: LogicalType,
    max_def: u16,
    path: String,
    chunk: Vec<u8>,
    pos: usize,
    dict: Option<Vec<Value>>,
    levels: VecDeque<(u16, u16)>,
    values: VecDeque<Value>,
}

impl LeafCursor {
    pub fn new(
        phys: PhysicalType,
        logical: LogicalType,
        max_def: u16,
        path: String,
        dict_page: Option<Vec<u8>>,
        pages: Vec<u8>,
    ) -> Result<Self, CodecError> {
        let dict = match dict_page {
            Some(bytes) => Some(decode_dict_page(&bytes, phys, &logical, &path)?),
            None => None,
        };
        Ok(Self {
            phys,
            logical,
            max_def,
            path,
            chunk: pages,
            pos: 0,
            dict,
            levels: VecDeque::new(),
            values: VecDeque::new(),
        })
    }

    pub fn max_def(&self) -> u16 {
        self.max_def
    }

    fn load_page(&mut self) -> Result<(), CodecError> {
        let (page, next) = decode_page(
            &self.chunk,
            self.pos,
            self.phys,
            &self.logical,
            self.dict.as_deref(),
            &self.path,
        )?;
        self.pos = next;
        let present = page
            .levels
            .iter()
            .filter(|(_, def)| *def == self.max_def)
            .count();
        if page.values.len() != present {
            return Err(CodecError::CorruptData(format!(
                "{}: page carries {} values for {present} present entries",
                self.path,
                page.values.len()
            )));
        }
        self.levels.extend(page.levels);
        self.values.extend(page.values);
        Ok(())
    }

    /// Levels of the next entry without consuming it; `None` once the
    /// chunk is exhausted.
    pub fn peek(&mut self) -> Result<Option<(u16, u16)>, CodecError> {
        while self.levels.is_empty() {
            if self.pos >= self.chunk.len() {
                return Ok(None);
            }
            self.load_page()?;
        }
        Ok(self.levels.front().copied())
    }

    /// Consumes one entry. The value is `Some` exactly when the entry's
    /// definition level reaches the leaf maximum.
    pub fn next_entry(&mut self) -> Result<(u16, u16, Option<Value>), CodecError> {
        let Some((rep, def)) = self.peek()? else {
            return Err(CodecError::CorruptData(format!(
                "{}: column stream exhausted mid-record",
                self.path
            )));
        };
        self.levels.pop_front();
        if def == self.max_def {
            let value = self.values.pop_front().ok_or_else(|| {
                CodecError::CorruptData(format!(
                    "{}: page value count lower than its definition levels imply",
                    self.path
                ))
            })?;
            Ok((rep, def, Some(value)))
        } else if def > self.max_def {
            Err(CodecError::CorruptData(format!(
                "{}: definition level {def} exceeds leaf maximum {}",
                self.path, self.max_def
            )))
        } else {
            Ok((rep, def, None))
        }
    }

    /// True when every entry of every page has been consumed.
    pub fn exhausted(&mut self) -> Result<bool, CodecError> {
        Ok(self.peek()?.is_none())
    }
}
