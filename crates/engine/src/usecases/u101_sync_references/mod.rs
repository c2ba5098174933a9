pub mod executor;

pub use executor::SyncReferencesExecutor;
