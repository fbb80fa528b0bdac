use thiserror::Error;
use tracing::{debug, info};

use crate::blob::{BlobReader, BlobWriter, ByteSink, ByteSource, InMemoryBlob};
use crate::config::CodecConfig;
use crate::decode::reader::RowCursor;
use crate::encode::writer::ValueWriter;
use crate::errors::CodecError;
use crate::schema::logical::Schema;
use crate::schema::mapper::map_schema;
use crate::value::equality::rows_logically_equal;
use crate::value::row::RowAccess;

/// Encodes every row, in input order, into one self-describing blob on
/// the given sink. The sink is returned sealed; on error the caller
/// discards it whole.
pub fn write_records<W, R>(
    sink: W,
    schema: &Schema,
    rows: &[R],
    config: &CodecConfig,
) -> Result<W, CodecError>
where
    W: ByteSink,
    R: RowAccess,
{
    let physical = map_schema(schema)?;
    let field_count = schema.fields().len();
    let mut writers: Vec<ValueWriter> = physical
        .columns
        .iter()
        .map(|c| ValueWriter::build(c, config, ""))
        .collect();

    for row in rows {
        if row.width() != field_count {
            return Err(CodecError::mismatch(
                "<row>",
                format!("row has {} values, schema has {field_count}", row.width()),
            ));
        }
        for (i, writer) in writers.iter_mut().enumerate() {
            writer.write(row.get(i), 0, 0)?;
        }
    }

    let mut chunks = Vec::with_capacity(physical.leaf_count());
    for writer in writers {
        writer.finish(&mut chunks);
    }
    let mut blob = BlobWriter::new(sink, &physical)?;
    for chunk in &chunks {
        blob.append_chunk(chunk)?;
    }
    let sink = blob.finish(rows.len() as u64)?;
    info!(
        target: "colcodec::write",
        rows = rows.len(),
        leaf_columns = chunks.len(),
        "write pass complete"
    );
    Ok(sink)
}

/// Opens a blob and returns a forward-only cursor over its rows, built
/// solely from the blob's embedded physical schema.
pub fn read_records<R: ByteSource>(source: R) -> Result<RowCursor, CodecError> {
    let mut blob = BlobReader::open(source)?;
    let chunks = blob.read_chunks()?;
    debug!(
        target: "colcodec::read",
        rows = blob.row_count(),
        leaf_columns = chunks.len(),
        "read pass opened"
    );
    RowCursor::new(blob.schema(), chunks, blob.row_count())
}

/// Round-trip verification failures. `Codec` wraps library errors; the
/// remaining variants are assertion outcomes of the comparison itself.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("row {position} diverges at {path}: {detail}")]
    Mismatch {
        position: usize,
        path: String,
        detail: String,
    },

    #[error("decoded stream ended after {got} of {expected} records")]
    Missing { got: usize, expected: usize },

    #[error("decoded stream yielded more than the {expected} records written")]
    Extra { expected: usize },
}

/// Encodes the rows into an in-memory blob, decodes them back, and
/// asserts positional equality under logical-type-aware comparison,
/// including exact stream exhaustion.
pub fn write_and_validate<R: RowAccess>(
    rows: &[R],
    schema: &Schema,
    config: &CodecConfig,
) -> Result<(), ValidateError> {
    let sink = write_records(InMemoryBlob::new(Vec::new()), schema, rows, config)?;
    let mut cursor = read_records(sink)?;
    for (position, expected) in rows.iter().enumerate() {
        let Some(actual) = cursor.read_next()? else {
            return Err(ValidateError::Missing {
                got: position,
                expected: rows.len(),
            });
        };
        rows_logically_equal(schema, expected, &actual).map_err(|m| ValidateError::Mismatch {
            position,
            path: m.path,
            detail: m.detail,
        })?;
    }
    if cursor.read_next()?.is_some() {
        return Err(ValidateError::Extra {
            expected: rows.len(),
        });
    }
    Ok(())
}
