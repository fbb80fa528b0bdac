pub mod format;
pub mod header;

pub use format::{BlobReader, BlobWriter, ChunkEntry};
pub use header::BlobHeader;

use std::io::{Read, Seek, Write};

/// Opaque seekable byte sink the caller supplies for a write pass.
pub trait ByteSink: Write + Seek {}
impl<T: Write + Seek> ByteSink for T {}

/// Opaque seekable byte source the caller supplies for a read pass.
pub trait ByteSource: Read + Seek {}
impl<T: Read + Seek> ByteSource for T {}

/// In-memory blob usable as both sink and source.
pub type InMemoryBlob = std::io::Cursor<Vec<u8>>;
