//! Token storage adapters.

mod file_storage;

pub use file_storage::{FileTokenStorage, TOKEN_FILE_NAME};
