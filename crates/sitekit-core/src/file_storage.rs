//! File storage abstraction for uploaded files.
//!
//! Business code talks to [`FileStorage`]; the only backend shipped is
//! [`LocalFileStorage`], which writes under a directory on disk and reports
//! public locations relative to the web root (`uploads/files/<name>`).

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs;

pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

pub trait FileStorage: Send + Sync {
    /// Saves `content` under `key` and returns the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Public location for a stored key.
    fn location(&self, key: &str) -> Result<String, StorageError>;

    fn max_file_size(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    public_prefix: String,
    max_file_size: usize,
}

impl LocalFileStorage {
    pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

    pub fn new(base_dir: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self::with_max_size(base_dir, public_prefix, Self::DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(
        base_dir: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
        max_file_size: usize,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            public_prefix: public_prefix.into(),
            max_file_size,
        }
    }

    /// Rejects empty keys, absolute paths, traversal and unusual characters.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with a separator".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(key.to_string())
        })
    }

    fn location(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;

        let prefix = self.public_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            Ok(key.to_string())
        } else {
            Ok(format!("{}/{}", prefix, key))
        }
    }

    fn max_file_size(&self) -> usize {
        self.max_file_size
    }
}
