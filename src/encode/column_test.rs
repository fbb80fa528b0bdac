use crate::config::CodecConfig;
use crate::encode::column::ColumnBuffer;
use crate::encode::page::{Encoding, PageHeader};
use crate::schema::physical::PhysicalType;

fn config(page_row_limit: usize, dict_max_entries: usize) -> CodecConfig {
    CodecConfig {
        page_row_limit,
        dict_max_entries,
        ..CodecConfig::default()
    }
}

fn read_page(buf: &[u8], pos: usize) -> (PageHeader, usize) {
    let header = PageHeader::read_from(&buf[pos..]).expect("page header");
    let next = pos + PageHeader::LEN + header.levels_len as usize + header.values_len as usize;
    (header, next)
}

#[test]
fn pages_cut_at_the_entry_limit() {
    let mut col = ColumnBuffer::new("c", PhysicalType::I32, &config(2, 1024));
    for v in 0..5i32 {
        col.push_value(0, 0, &v.to_le_bytes());
    }
    let chunk = col.finish();

    let (first, pos) = read_page(&chunk.pages, 0);
    assert_eq!(first.entry_count, 2);
    let (second, pos) = read_page(&chunk.pages, pos);
    assert_eq!(second.entry_count, 2);
    let (third, pos) = read_page(&chunk.pages, pos);
    assert_eq!(third.entry_count, 1);
    assert_eq!(pos, chunk.pages.len());
}

#[test]
fn dictionary_page_present_only_when_a_page_used_codes() {
    let mut col = ColumnBuffer::new("c", PhysicalType::I32, &config(256, 1024));
    col.push_value(0, 0, &7i32.to_le_bytes());
    col.push_value(0, 0, &7i32.to_le_bytes());
    let chunk = col.finish();

    let (header, _) = read_page(&chunk.pages, 0);
    assert_eq!(Encoding::from_u8(header.encoding), Some(Encoding::Dictionary));
    // Two entries, one distinct value.
    let dict = chunk.dict_page.expect("dictionary page");
    assert_eq!(&dict[..4], &1u32.to_le_bytes());
}

#[test]
fn boolean_columns_never_use_the_dictionary() {
    let mut col = ColumnBuffer::new("c", PhysicalType::Bool, &config(256, 1024));
    col.push_value(0, 0, &[1]);
    col.push_value(0, 0, &[1]);
    let chunk = col.finish();

    assert!(chunk.dict_page.is_none());
    let (header, _) = read_page(&chunk.pages, 0);
    assert_eq!(Encoding::from_u8(header.encoding), Some(Encoding::Plain));
}

#[test]
fn fallback_happens_at_a_page_boundary() {
    // Entry budget of 1 distinct value, pages of 2 entries. The first
    // page accumulates two distinct values, so the budget check after
    // its flush demotes the column; later pages are plain.
    let mut col = ColumnBuffer::new("c", PhysicalType::I32, &config(2, 1));
    for v in 0..6i32 {
        col.push_value(0, 0, &v.to_le_bytes());
    }
    let chunk = col.finish();

    let (first, pos) = read_page(&chunk.pages, 0);
    assert_eq!(Encoding::from_u8(first.encoding), Some(Encoding::Dictionary));
    let (second, pos) = read_page(&chunk.pages, pos);
    assert_eq!(Encoding::from_u8(second.encoding), Some(Encoding::Plain));
    let (third, _) = read_page(&chunk.pages, pos);
    assert_eq!(Encoding::from_u8(third.encoding), Some(Encoding::Plain));

    // The flushed dictionary page stays for the first page's codes.
    assert!(chunk.dict_page.is_some());
}

#[test]
fn null_only_page_is_plain_with_no_values() {
    let mut col = ColumnBuffer::new("c", PhysicalType::I32, &config(256, 1024));
    col.push_null(0, 0);
    col.push_null(0, 0);
    let chunk = col.finish();

    assert!(chunk.dict_page.is_none());
    let (header, _) = read_page(&chunk.pages, 0);
    assert_eq!(Encoding::from_u8(header.encoding), Some(Encoding::Plain));
    assert_eq!(header.entry_count, 2);
    assert_eq!(header.value_count, 0);
    assert_eq!(header.values_len, 0);
}

#[test]
fn levels_are_stored_as_u16_pairs() {
    let mut col = ColumnBuffer::new("c", PhysicalType::I32, &config(256, 1024));
    col.push_null(1, 2);
    let chunk = col.finish();

    let (header, _) = read_page(&chunk.pages, 0);
    assert_eq!(header.levels_len, 4);
    let levels = &chunk.pages[PageHeader::LEN..PageHeader::LEN + 4];
    assert_eq!(levels, &[1, 0, 2, 0]);
}
