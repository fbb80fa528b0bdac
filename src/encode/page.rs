/// Per-page value encoding. The choice is invisible above the column
/// layer: readers dispatch on the header byte.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Plain = 0,
    Dictionary = 1,
}

impl Encoding {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Encoding::Plain),
            1 => Some(Encoding::Dictionary),
            _ => None,
        }
    }
}

impl From<Encoding> for u8 {
    fn from(e: Encoding) -> u8 {
        e as u8
    }
}

/// Fixed-size page header, little-endian throughout.
///
/// A page carries `entry_count` level entries (one (rep, def) pair each)
/// and `value_count` present values (entries whose def level hits the
/// leaf maximum).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageHeader {
    pub encoding: u8,
    pub flags: u8,
    pub reserved: u16,
    pub entry_count: u32,
    pub value_count: u32,
    pub levels_len: u32,
    pub values_len: u32,
}

impl PageHeader {
    pub const LEN: usize = 1 + 1 + 2 + 4 + 4 + 4 + 4;

    pub fn new(encoding: Encoding, entry_count: u32, value_count: u32, levels_len: u32, values_len: u32) -> Self {
        Self {
            encoding: encoding.into(),
            flags: 0,
            reserved: 0,
            entry_count,
            value_count,
            levels_len,
            values_len,
        }
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.encoding);
        buf.push(self.flags);
        buf.extend_from_slice(&self.reserved.to_le_bytes());
        buf.extend_from_slice(&self.entry_count.to_le_bytes());
        buf.extend_from_slice(&self.value_count.to_le_bytes());
        buf.extend_from_slice(&self.levels_len.to_le_bytes());
        buf.extend_from_slice(&self.values_len.to_le_bytes());
    }

    pub fn read_from(slice: &[u8]) -> Option<Self> {
        if slice.len() < Self::LEN {
            return None;
        }
        let mut w = [0u8; 2];
        w.copy_from_slice(&slice[2..4]);
        let reserved = u16::from_le_bytes(w);
        let mut d = [0u8; 4];
        d.copy_from_slice(&slice[4..8]);
        let entry_count = u32::from_le_bytes(d);
        d.copy_from_slice(&slice[8..12]);
        let value_count = u32::from_le_bytes(d);
        d.copy_from_slice(&slice[12..16]);
        let levels_len = u32::from_le_bytes(d);
        d.copy_from_slice(&slice[16..20]);
        let values_len = u32::from_le_bytes(d);
        Some(Self {
            encoding: slice[0],
            flags: slice[1],
            reserved,
            entry_count,
            value_count,
            levels_len,
            values_len,
        })
    }
}
