pub mod catalog;
pub mod config;
pub mod rate_limit;
pub mod stores;
