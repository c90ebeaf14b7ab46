use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public path of a stored file, in the shape rich-text editors expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadedFile {
    pub location: String,
}

/// Multipart body of `POST /upload-file`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
