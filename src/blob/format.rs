use std::io::SeekFrom;

use serde::{Deserialize, Serialize};

use crate::blob::header::BlobHeader;
use crate::blob::{ByteSink, ByteSource};
use crate::encode::column::ColumnChunk;
use crate::errors::CodecError;
use crate::schema::physical::PhysicalSchema;

/// Location of one leaf column's chunk inside the blob. `dict_len == 0`
/// means the column carries no dictionary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub offset: u64,
    pub dict_len: u64,
    pub data_len: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BlobFooter {
    row_count: u64,
    chunks: Vec<ChunkEntry>,
}

const TRAILER_LEN: u64 = 8 + 4;

/// Writes one self-describing blob: header, embedded physical schema,
/// column chunks, then a footer with the chunk directory and row count.
///
/// A pass either reaches `finish` or the blob is discarded whole; there
/// is no partial-commit state to resume from.
pub struct BlobWriter<W: ByteSink> {
    sink: W,
    offset: u64,
    chunks: Vec<ChunkEntry>,
}

impl<W: ByteSink> BlobWriter<W> {
    pub fn new(mut sink: W, schema: &PhysicalSchema) -> Result<Self, CodecError> {
        sink.seek(SeekFrom::Start(0))?;
        BlobHeader::new().write_to(&mut sink)?;
        let encoded =
            bincode::serialize(schema).map_err(|e| CodecError::Metadata(e.to_string()))?;
        sink.write_all(&(encoded.len() as u32).to_le_bytes())?;
        sink.write_all(&encoded)?;
        let offset = BlobHeader::TOTAL_LEN as u64 + 4 + encoded.len() as u64;
        Ok(Self {
            sink,
            offset,
            chunks: Vec::new(),
        })
    }

    /// Appends one leaf column chunk; call order must match the physical
    /// schema's depth-first leaf order.
    pub fn append_chunk(&mut self, chunk: &ColumnChunk) -> Result<(), CodecError> {
        let dict_len = chunk.dict_page.as_ref().map_or(0, |d| d.len()) as u64;
        if let Some(dict) = &chunk.dict_page {
            self.sink.write_all(dict)?;
        }
        self.sink.write_all(&chunk.pages)?;
        self.chunks.push(ChunkEntry {
            offset: self.offset,
            dict_len,
            data_len: chunk.pages.len() as u64,
        });
        self.offset += dict_len + chunk.pages.len() as u64;
        Ok(())
    }

    /// Seals the blob with the footer and trailer, returning the sink.
    pub fn finish(mut self, row_count: u64) -> Result<W, CodecError> {
        let footer = BlobFooter {
            row_count,
            chunks: self.chunks,
        };
        let encoded =
            bincode::serialize(&footer).map_err(|e| CodecError::Metadata(e.to_string()))?;
        let mut crc = crc32fast::Hasher::new();
        crc.update(&encoded);
        self.sink.write_all(&(encoded.len() as u32).to_le_bytes())?;
        self.sink.write_all(&encoded)?;
        self.sink.write_all(&self.offset.to_le_bytes())?;
        self.sink.write_all(&crc.finalize().to_le_bytes())?;
        self.sink.flush()?;
        Ok(self.sink)
    }
}

/// Opens a finished blob, validating header, footer crc, and the
/// embedded physical schema. Reads never consult the caller's logical
/// schema object.
#[derive(Debug)]
pub struct BlobReader<R: ByteSource> {
    source: R,
    schema: PhysicalSchema,
    footer: BlobFooter,
}

impl<R: ByteSource> BlobReader<R> {
    pub fn open(mut source: R) -> Result<Self, CodecError> {
        let total = source.seek(SeekFrom::End(0))?;
        if total < BlobHeader::TOTAL_LEN as u64 + TRAILER_LEN {
            return Err(CodecError::CorruptData(
                "blob shorter than header and trailer".to_string(),
            ));
        }
        source.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
        let mut eight = [0u8; 8];
        source.read_exact(&mut eight)?;
        let footer_offset = u64::from_le_bytes(eight);
        let mut four = [0u8; 4];
        source.read_exact(&mut four)?;
        let expected_crc = u32::from_le_bytes(four);

        if footer_offset + 4 + TRAILER_LEN > total {
            return Err(CodecError::CorruptData(
                "footer offset out of bounds".to_string(),
            ));
        }
        source.seek(SeekFrom::Start(footer_offset))?;
        source.read_exact(&mut four)?;
        let footer_len = u32::from_le_bytes(four) as usize;
        if footer_offset + 4 + footer_len as u64 > total - TRAILER_LEN {
            return Err(CodecError::CorruptData(format!(
                "footer length {footer_len} overruns the blob"
            )));
        }
        let mut footer_bytes = vec![0u8; footer_len];
        source.read_exact(&mut footer_bytes)?;
        let mut crc = crc32fast::Hasher::new();
        crc.update(&footer_bytes);
        if crc.finalize() != expected_crc {
            return Err(CodecError::CorruptData("footer crc mismatch".to_string()));
        }
        let footer: BlobFooter = bincode::deserialize(&footer_bytes)
            .map_err(|e| CodecError::CorruptData(format!("footer decode: {e}")))?;

        source.seek(SeekFrom::Start(0))?;
        BlobHeader::read_from(&mut source)?;
        source.read_exact(&mut four)?;
        let schema_len = u32::from_le_bytes(four) as usize;
        let mut schema_bytes = vec![0u8; schema_len];
        source.read_exact(&mut schema_bytes)?;
        let schema: PhysicalSchema = bincode::deserialize(&schema_bytes)
            .map_err(|e| CodecError::CorruptData(format!("schema decode: {e}")))?;
        schema.validate()?;

        if footer.chunks.len() != schema.leaf_count() {
            return Err(CodecError::CorruptData(format!(
                "chunk directory has {} entries for {} schema leaves",
                footer.chunks.len(),
                schema.leaf_count()
            )));
        }
        Ok(Self {
            source,
            schema,
            footer,
        })
    }

    pub fn schema(&self) -> &PhysicalSchema {
        &self.schema
    }

    pub fn row_count(&self) -> u64 {
        self.footer.row_count
    }

    /// Loads every chunk's bytes in directory order: (dictionary page,
    /// data pages) per leaf.
    pub fn read_chunks(&mut self) -> Result<Vec<(Option<Vec<u8>>, Vec<u8>)>, CodecError> {
        let mut out = Vec::with_capacity(self.footer.chunks.len());
        for entry in &self.footer.chunks {
            self.source.seek(SeekFrom::Start(entry.offset))?;
            let dict = if entry.dict_len > 0 {
                let mut dict = vec![0u8; entry.dict_len as usize];
                self.source.read_exact(&mut dict)?;
                Some(dict)
            } else {
                None
            };
            let mut pages = vec![0u8; entry.data_len as usize];
            self.source.read_exact(&mut pages)?;
            out.push((dict, pages));
        }
        Ok(out)
    }
}
