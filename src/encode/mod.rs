pub mod column;
pub mod dictionary;
pub mod page;
pub mod plain;
pub mod writer;

pub use column::{ColumnBuffer, ColumnChunk};
pub use writer::ValueWriter;

#[cfg(test)]
mod column_test;
#[cfg(test)]
mod plain_test;
