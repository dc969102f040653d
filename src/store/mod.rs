// ストア層 - ItemStore の具象実装

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileItemStore;
pub use memory::MemoryItemStore;
