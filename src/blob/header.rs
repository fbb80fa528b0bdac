use std::io::{Read, Write};

use crc32fast::Hasher as Crc32Hasher;

use crate::errors::CodecError;

pub const BLOB_MAGIC: [u8; 8] = *b"COLCODEC";
pub const BLOB_VERSION: u16 = 1;

/// Fixed leading header of every blob: magic, format version, and a
/// crc32 over the header fields themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    pub magic: [u8; 8],
    pub version: u16,
    pub flags: u16,
    pub reserved: u32,
    pub header_crc32: u32,
}

impl BlobHeader {
    pub const TOTAL_LEN: usize = 8 + 2 + 2 + 4 + 4;

    pub fn new() -> Self {
        let mut header = Self {
            magic: BLOB_MAGIC,
            version: BLOB_VERSION,
            flags: 0,
            reserved: 0,
            header_crc32: 0,
        };
        header.header_crc32 = header.compute_crc32();
        header
    }

    fn compute_crc32(&self) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(&self.magic);
        hasher.update(&self.version.to_le_bytes());
        hasher.update(&self.flags.to_le_bytes());
        hasher.update(&self.reserved.to_le_bytes());
        hasher.finalize()
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        w.write_all(&self.magic)?;
        w.write_all(&self.version.to_le_bytes())?;
        w.write_all(&self.flags.to_le_bytes())?;
        w.write_all(&self.reserved.to_le_bytes())?;
        w.write_all(&self.header_crc32.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut r: R) -> Result<Self, CodecError> {
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)?;
        let mut two = [0u8; 2];
        r.read_exact(&mut two)?;
        let version = u16::from_le_bytes(two);
        r.read_exact(&mut two)?;
        let flags = u16::from_le_bytes(two);
        let mut four = [0u8; 4];
        r.read_exact(&mut four)?;
        let reserved = u32::from_le_bytes(four);
        r.read_exact(&mut four)?;
        let header_crc32 = u32::from_le_bytes(four);

        let header = Self {
            magic,
            version,
            flags,
            reserved,
            header_crc32,
        };
        if header.magic != BLOB_MAGIC {
            return Err(CodecError::CorruptData("bad blob magic".to_string()));
        }
        if header.version != BLOB_VERSION {
            return Err(CodecError::CorruptData(format!(
                "unsupported blob version {}",
                header.version
            )));
        }
        if header.header_crc32 != header.compute_crc32() {
            return Err(CodecError::CorruptData(
                "blob header crc mismatch".to_string(),
            ));
        }
        Ok(header)
    }
}

impl Default for BlobHeader {
    fn default() -> Self {
        Self::new()
    }
}
