pub mod logical;
pub mod mapper;
pub mod physical;

pub use logical::{Field, LogicalType, Schema, TimeUnit};
pub use mapper::map_schema;
pub use physical::{ColumnNode, NodeKind, PhysicalSchema, PhysicalType};

#[cfg(test)]
mod logical_test;
#[cfg(test)]
mod physical_test;
