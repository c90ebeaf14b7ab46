use std::env;
use std::path::PathBuf;

use sitekit_core::file_storage::LocalFileStorage;

#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Directory uploaded files are written to.
    pub dir: PathBuf,
    /// Prefix of the location returned to clients.
    pub public_prefix: String,
    pub max_bytes: usize,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
            public_prefix: env::var("UPLOAD_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "uploads".to_string()),
            max_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LocalFileStorage::DEFAULT_MAX_FILE_SIZE),
        }
    }

    pub fn storage(&self) -> LocalFileStorage {
        LocalFileStorage::with_max_size(&self.dir, &self.public_prefix, self.max_bytes)
    }
}
