pub mod blob;
pub mod config;
pub mod decode;
pub mod driver;
pub mod encode;
pub mod errors;
pub mod generate;
pub mod schema;
pub mod value;

pub use errors::*;
