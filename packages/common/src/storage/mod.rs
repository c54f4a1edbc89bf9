mod error;
mod traits;

pub mod filesystem;
pub mod name;

pub use error::StorageError;
pub use filesystem::FilesystemMediaStore;
pub use traits::MediaStore;
