pub mod common;
pub mod u101_sync_references;
pub mod u102_upload_products;
