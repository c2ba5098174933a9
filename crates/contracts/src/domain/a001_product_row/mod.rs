pub mod aggregate;

pub use aggregate::{ProductRow, RecordKind};
