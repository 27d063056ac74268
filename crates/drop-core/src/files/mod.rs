//! The shared file directory.

pub mod naming;
pub mod record;
pub mod store;

pub use naming::validate_file_name;
pub use record::{format_modified, format_size, FileRecord};
pub use store::FileStore;
