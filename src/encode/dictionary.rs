use std::collections::HashMap;

use crate::config::CodecConfig;

/// Encoding state of a single column within one write pass.
///
/// The transition is one-way: once a column has fallen back to plain
/// encoding it never returns to dictionary encoding in that pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictState {
    Dictionary,
    Plain,
}

/// Append-only value-to-code table built incrementally during a write
/// pass. Keys are the plain-encoded bytes of each distinct value.
#[derive(Debug)]
pub struct DictEncoder {
    state: DictState,
    codes: HashMap<Vec<u8>, u32>,
    // Insertion order; becomes the dictionary page.
    values: Vec<Vec<u8>>,
    bytes: usize,
    max_entries: usize,
    max_bytes: usize,
}

impl DictEncoder {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            state: DictState::Dictionary,
            codes: HashMap::new(),
            values: Vec::new(),
            bytes: 0,
            max_entries: config.dict_max_entries,
            max_bytes: config.dict_max_bytes,
        }
    }

    pub fn state(&self) -> DictState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the code for an encoded value, assigning the next code on
    /// first sight. Only legal while in the `Dictionary` state.
    pub fn code_for(&mut self, encoded: &[u8]) -> u32 {
        debug_assert_eq!(self.state, DictState::Dictionary);
        if let Some(code) = self.codes.get(encoded) {
            return *code;
        }
        let code = self.values.len() as u32;
        self.codes.insert(encoded.to_vec(), code);
        self.values.push(encoded.to_vec());
        self.bytes += encoded.len();
        code
    }

    pub fn over_budget(&self) -> bool {
        self.values.len() > self.max_entries || self.bytes > self.max_bytes
    }

    /// One-way transition to plain encoding. The accumulated table stays
    /// intact: pages already flushed reference it.
    pub fn demote(&mut self) {
        self.state = DictState::Plain;
    }

    /// Serializes the dictionary page: value count, then each value in
    /// code order in its plain encoding.
    pub fn encode_page(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.values.len() as u32).to_le_bytes());
        for v in &self.values {
            out.extend_from_slice(v);
        }
        out
    }
}
