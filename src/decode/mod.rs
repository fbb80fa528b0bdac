pub mod column;
pub mod pages;
pub mod reader;

pub use reader::{RowCursor, ValueReader};

#[cfg(test)]
mod reader_test;
