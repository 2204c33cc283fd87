pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod record_store;
