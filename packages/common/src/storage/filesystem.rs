use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::name::{alternative_name, validate_storage_name};
use super::traits::MediaStore;

/// How many alternative names to try before giving up on an upload.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem-backed media store.
///
/// Files live at `{base_path}/{name}`. Uploads are written to
/// `{base_path}/.tmp` first and hard-linked into place, so a taken name is
/// never overwritten and readers never see a half-written file.
pub struct FilesystemMediaStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store rooted at `base_path`.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn file_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_storage_name(name)?;
        Ok(self.base_path.join(name))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    async fn link_available(&self, temp: &Path, name: &str) -> Result<String, StorageError> {
        let mut candidate = name.to_string();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let target = self.file_path(&candidate)?;
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).await?;
            }
            match fs::hard_link(temp, &target).await {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = alternative_name(name);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorageError::NameExhausted(name.to_string()))
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn save(&self, name: &str, data: &[u8]) -> Result<String, StorageError> {
        validate_storage_name(name)?;
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        let result = self.link_available(&temp_path, name).await;
        let _ = fs::remove_file(&temp_path).await;

        let stored = result?;
        if stored != name {
            tracing::debug!(requested = name, stored = %stored, "Media name taken, renamed");
        }
        Ok(stored)
    }

    async fn open(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.file_path(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(name.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.file_path(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.file_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
