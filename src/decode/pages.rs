use crate::encode::page::{Encoding, PageHeader};
use crate::errors::CodecError;
use crate::schema::logical::LogicalType;
use crate::schema::physical::PhysicalType;
use crate::value::Value;

/// One fully parsed data page: level entries plus present values in
/// entry order (dictionary codes already resolved).
#[derive(Debug)]
pub struct DecodedPage {
    pub levels: Vec<(u16, u16)>,
    pub values: Vec<Value>,
}

/// Parses the page starting at `pos`, returning the page and the offset
/// just past it.
pub fn decode_page(
    chunk: &[u8],
    pos: usize,
    phys: PhysicalType,
    logical: &LogicalType,
    dict: Option<&[Value]>,
    path: &str,
) -> Result<(DecodedPage, usize), CodecError> {
    let header = PageHeader::read_from(&chunk[pos..]).ok_or_else(|| {
        CodecError::CorruptData(format!("{path}: truncated page header at offset {pos}"))
    })?;
    let levels_start = pos + PageHeader::LEN;
    let values_start = levels_start + header.levels_len as usize;
    let end = values_start + header.values_len as usize;
    if end > chunk.len() {
        return Err(CodecError::CorruptData(format!(
            "{path}: page body overruns chunk ({end} > {})",
            chunk.len()
        )));
    }
    let entry_count = header.entry_count as usize;
    if header.levels_len as usize != entry_count * 4 {
        return Err(CodecError::CorruptData(format!(
            "{path}: level section length {} does not match {entry_count} entries",
            header.levels_len
        )));
    }
    let mut levels = Vec::with_capacity(entry_count);
    for i in 0..entry_count {
        let base = levels_start + i * 4;
        let rep = u16::from_le_bytes([chunk[base], chunk[base + 1]]);
        let def = u16::from_le_bytes([chunk[base + 2], chunk[base + 3]]);
        levels.push((rep, def));
    }

    let value_bytes = &chunk[values_start..end];
    let value_count = header.value_count as usize;
    let encoding = Encoding::from_u8(header.encoding).ok_or_else(|| {
        CodecError::CorruptData(format!(
            "{path}: unknown page encoding byte {}",
            header.encoding
        ))
    })?;
    let values = match encoding {
        Encoding::Plain => decode_plain_values(value_bytes, value_count, phys, logical, path)?,
        Encoding::Dictionary => {
            let dict = dict.ok_or_else(|| {
                CodecError::CorruptData(format!(
                    "{path}: dictionary-encoded page in a chunk with no dictionary"
                ))
            })?;
            if value_bytes.len() != value_count * 4 {
                return Err(CodecError::CorruptData(format!(
                    "{path}: code section length {} does not match {value_count} values",
                    value_bytes.len()
                )));
            }
            let mut out = Vec::with_capacity(value_count);
            for i in 0..value_count {
                let base = i * 4;
                let code = u32::from_le_bytes([
                    value_bytes[base],
                    value_bytes[base + 1],
                    value_bytes[base + 2],
                    value_bytes[base + 3],
                ]) as usize;
                let v = dict.get(code).ok_or_else(|| {
                    CodecError::CorruptData(format!(
                        "{path}: dictionary code {code} out of range ({} entries)",
                        dict.len()
                    ))
                })?;
                out.push(v.clone());
            }
            out
        }
    };
    Ok((DecodedPage { levels, values }, end))
}

/// Decodes the dictionary page into values in code order.
pub fn decode_dict_page(
    bytes: &[u8],
    phys: PhysicalType,
    logical: &LogicalType,
    path: &str,
) -> Result<Vec<Value>, CodecError> {
    if bytes.len() < 4 {
        return Err(CodecError::CorruptData(format!(
            "{path}: truncated dictionary page"
        )));
    }
    let count = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    decode_plain_values(&bytes[4..], count, phys, logical, path)
}

fn decode_plain_values(
    buf: &[u8],
    count: usize,
    phys: PhysicalType,
    logical: &LogicalType,
    path: &str,
) -> Result<Vec<Value>, CodecError> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = 0usize;
    for _ in 0..count {
        let (value, next) = decode_one(buf, cursor, phys, logical, path)?;
        out.push(value);
        cursor = next;
    }
    if cursor != buf.len() {
        return Err(CodecError::CorruptData(format!(
            "{path}: {} trailing bytes after {count} values",
            buf.len() - cursor
        )));
    }
    Ok(out)
}

fn take<'a>(buf: &'a [u8], pos: usize, n: usize, path: &str) -> Result<&'a [u8], CodecError> {
    buf.get(pos..pos + n)
        .ok_or_else(|| CodecError::CorruptData(format!("{path}: value payload truncated")))
}

fn decode_one(
    buf: &[u8],
    pos: usize,
    phys: PhysicalType,
    logical: &LogicalType,
    path: &str,
) -> Result<(Value, usize), CodecError> {
    match phys {
        PhysicalType::Bool => {
            let b = take(buf, pos, 1, path)?[0];
            Ok((Value::Bool(b != 0), pos + 1))
        }
        PhysicalType::I32 => {
            let raw = i32::from_le_bytes(take(buf, pos, 4, path)?.try_into().unwrap());
            let value = match logical {
                LogicalType::Int32 => Value::I32(raw),
                LogicalType::Date => Value::Date(raw),
                LogicalType::Decimal { precision, scale } => Value::Decimal {
                    unscaled: raw as i128,
                    precision: *precision,
                    scale: *scale,
                },
                other => {
                    return Err(CodecError::CorruptData(format!(
                        "{path}: i32 storage under {other:?} annotation"
                    )));
                }
            };
            Ok((value, pos + 4))
        }
        PhysicalType::I64 => {
            let raw = i64::from_le_bytes(take(buf, pos, 8, path)?.try_into().unwrap());
            let value = match logical {
                LogicalType::Int64 => Value::I64(raw),
                LogicalType::Time => Value::Time(raw),
                LogicalType::Timestamp { unit, zoned } => Value::Timestamp {
                    value: raw,
                    unit: *unit,
                    zoned: *zoned,
                },
                LogicalType::Decimal { precision, scale } => Value::Decimal {
                    unscaled: raw as i128,
                    precision: *precision,
                    scale: *scale,
                },
                other => {
                    return Err(CodecError::CorruptData(format!(
                        "{path}: i64 storage under {other:?} annotation"
                    )));
                }
            };
            Ok((value, pos + 8))
        }
        PhysicalType::F32 => {
            let raw = f32::from_le_bytes(take(buf, pos, 4, path)?.try_into().unwrap());
            Ok((Value::F32(raw), pos + 4))
        }
        PhysicalType::F64 => {
            let raw = f64::from_le_bytes(take(buf, pos, 8, path)?.try_into().unwrap());
            Ok((Value::F64(raw), pos + 8))
        }
        PhysicalType::Bytes => {
            let len =
                u32::from_le_bytes(take(buf, pos, 4, path)?.try_into().unwrap()) as usize;
            let payload = take(buf, pos + 4, len, path)?;
            let value = match logical {
                LogicalType::String => {
                    let s = std::str::from_utf8(payload).map_err(|_| {
                        CodecError::CorruptData(format!("{path}: string payload is not UTF-8"))
                    })?;
                    Value::Str(s.to_string())
                }
                LogicalType::Binary => Value::Bytes(payload.to_vec()),
                other => {
                    return Err(CodecError::CorruptData(format!(
                        "{path}: var-bytes storage under {other:?} annotation"
                    )));
                }
            };
            Ok((value, pos + 4 + len))
        }
        PhysicalType::FixedBytes(n) => {
            let payload = take(buf, pos, n, path)?;
            match logical {
                LogicalType::FixedBinary { .. } => Ok((Value::Fixed(payload.to_vec()), pos + n)),
                other => Err(CodecError::CorruptData(format!(
                    "{path}: fixed-bytes storage under {other:?} annotation"
                ))),
            }
        }
        PhysicalType::I128(n) => {
            let payload = take(buf, pos, n, path)?;
            let negative = payload[n - 1] & 0x80 != 0;
            let mut full = if negative { [0xFFu8; 16] } else { [0u8; 16] };
            full[..n].copy_from_slice(payload);
            let unscaled = i128::from_le_bytes(full);
            match logical {
                LogicalType::Decimal { precision, scale } => Ok((
                    Value::Decimal {
                        unscaled,
                        precision: *precision,
                        scale: *scale,
                    },
                    pos + n,
                )),
                other => Err(CodecError::CorruptData(format!(
                    "{path}: wide integer storage under {other:?} annotation"
                ))),
            }
        }
    }
}
