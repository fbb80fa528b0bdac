use tracing::debug;

use crate::config::CodecConfig;
use crate::encode::dictionary::{DictEncoder, DictState};
use crate::encode::page::{Encoding, PageHeader};
use crate::schema::physical::PhysicalType;

/// Flushed output of one leaf column: an optional dictionary page plus
/// the concatenated data pages.
#[derive(Debug)]
pub struct ColumnChunk {
    pub dict_page: Option<Vec<u8>>,
    pub pages: Vec<u8>,
}

/// Write-side buffer for a single leaf column.
///
/// Accumulates (rep, def) level entries plus present values, cutting a
/// page whenever the entry budget fills. Values start out dictionary
/// encoded; crossing the dictionary budget demotes the column to plain
/// encoding for pages flushed afterwards. Pages already written keep
/// their dictionary codes.
#[derive(Debug)]
pub struct ColumnBuffer {
    name: String,
    dict: DictEncoder,
    dict_enabled: bool,
    levels: Vec<(u16, u16)>,
    codes: Vec<u32>,
    plain: Vec<u8>,
    value_count: u32,
    pages: Vec<u8>,
    any_dict_pages: bool,
    page_row_limit: usize,
}

impl ColumnBuffer {
    pub fn new(name: &str, phys: PhysicalType, config: &CodecConfig) -> Self {
        Self {
            name: name.to_string(),
            dict: DictEncoder::new(config),
            dict_enabled: phys.dictionary_eligible(),
            levels: Vec::new(),
            codes: Vec::new(),
            plain: Vec::new(),
            value_count: 0,
            pages: Vec::new(),
            any_dict_pages: false,
            page_row_limit: config.page_row_limit.max(1),
        }
    }

    /// Appends a level entry with no value (definition level below the
    /// leaf maximum).
    pub fn push_null(&mut self, rep: u16, def: u16) {
        self.levels.push((rep, def));
        self.maybe_cut_page();
    }

    /// Appends a level entry plus the plain-encoded value bytes.
    pub fn push_value(&mut self, rep: u16, def: u16, encoded: &[u8]) {
        self.levels.push((rep, def));
        self.value_count += 1;
        if self.dict_enabled && self.dict.state() == DictState::Dictionary {
            self.codes.push(self.dict.code_for(encoded));
        } else {
            self.plain.extend_from_slice(encoded);
        }
        self.maybe_cut_page();
    }

    fn maybe_cut_page(&mut self) {
        if self.levels.len() >= self.page_row_limit {
            self.flush_page();
        }
    }

    fn flush_page(&mut self) {
        if self.levels.is_empty() {
            return;
        }
        let encoding = if self.codes.is_empty() {
            Encoding::Plain
        } else {
            Encoding::Dictionary
        };
        let levels_len = (self.levels.len() * 4) as u32;
        let values: Vec<u8> = match encoding {
            Encoding::Dictionary => {
                self.any_dict_pages = true;
                let mut out = Vec::with_capacity(self.codes.len() * 4);
                for code in &self.codes {
                    out.extend_from_slice(&code.to_le_bytes());
                }
                out
            }
            Encoding::Plain => std::mem::take(&mut self.plain),
        };
        let header = PageHeader::new(
            encoding,
            self.levels.len() as u32,
            self.value_count,
            levels_len,
            values.len() as u32,
        );
        header.write_to(&mut self.pages);
        for (rep, def) in &self.levels {
            self.pages.extend_from_slice(&rep.to_le_bytes());
            self.pages.extend_from_slice(&def.to_le_bytes());
        }
        self.pages.extend_from_slice(&values);

        self.levels.clear();
        self.codes.clear();
        self.plain.clear();
        self.value_count = 0;

        // Fallback is decided at page boundaries; the page just flushed
        // keeps its codes.
        if self.dict_enabled
            && self.dict.state() == DictState::Dictionary
            && self.dict.over_budget()
        {
            debug!(
                target: "colcodec::write",
                column = %self.name,
                distinct = self.dict.len(),
                "dictionary budget exceeded, column falls back to plain encoding"
            );
            self.dict.demote();
        }
    }

    /// Flushes the trailing page and seals the chunk.
    pub fn finish(mut self) -> ColumnChunk {
        self.flush_page();
        let dict_page = if self.any_dict_pages {
            Some(self.dict.encode_page())
        } else {
            None
        };
        ColumnChunk {
            dict_page,
            pages: self.pages,
        }
    }
}
