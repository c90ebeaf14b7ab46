use tracing::instrument;
use uuid::Uuid;

use sitekit_core::AppError;
use sitekit_core::file_storage::{FileStorage, StorageError};

use crate::modules::uploads::model::UploadedFile;

pub const FILE_FIELD: &str = "file";
const FALLBACK_EXTENSION: &str = "bin";

pub struct UploadService;

pub fn too_large(max_bytes: usize) -> AppError {
    StorageError::InvalidFileSize { max_bytes }.into()
}

/// Lower-cased extension of `file_name`, or `bin` when it has none or an odd one.
pub fn file_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

impl UploadService {
    /// Stores `content` as `files/<uuid>.<ext>` and returns its public location.
    #[instrument(skip(storage, content), fields(size = content.len()))]
    pub async fn store_file(
        storage: &dyn FileStorage,
        file_name: Option<&str>,
        content: &[u8],
    ) -> Result<UploadedFile, AppError> {
        if content.is_empty() {
            return Err(AppError::invalid_field(
                FILE_FIELD,
                "The file field is required.",
            ));
        }

        let key = format!("files/{}.{}", Uuid::new_v4(), file_extension(file_name));
        let key = storage.save(&key, content).await?;
        let location = storage.location(&key)?;

        tracing::info!(%location, "File uploaded");
        Ok(UploadedFile { location })
    }
}
