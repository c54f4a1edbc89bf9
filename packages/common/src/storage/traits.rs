use async_trait::async_trait;

use super::error::StorageError;

/// Name-addressed storage for user uploads.
///
/// Names are relative, `/`-separated paths such as `posts/small.gif`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` under `name`, or under a free variant of it when `name`
    /// is taken. Returns the name the file was actually stored as.
    async fn save(&self, name: &str, data: &[u8]) -> Result<String, StorageError>;

    /// Read a stored file back.
    async fn open(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a file exists.
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;
}
