pub mod classify;
pub mod executor;
pub mod payload;

pub use executor::UploadExecutor;
pub use payload::UploadParams;
