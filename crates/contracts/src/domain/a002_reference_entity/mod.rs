pub mod aggregate;

pub use aggregate::{ReferenceEntity, ReferenceKind};
