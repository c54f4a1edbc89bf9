pub mod storage;

pub use storage::{FilesystemMediaStore, MediaStore, StorageError};
