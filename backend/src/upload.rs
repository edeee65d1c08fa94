use actix_multipart::{Multipart, MultipartError};
use futures::{StreamExt, TryStreamExt};

use crate::storage::secure_filename;

pub const FILE_FIELD: &str = "file";

/// A file part received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub sanitized_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, content: Vec<u8>) -> Self {
        let original_name = original_name.into();
        let sanitized_name = secure_filename(&original_name);
        Self {
            original_name,
            sanitized_name,
            content,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.original_name.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File too large")]
    TooLarge { limit: usize },
    #[error("Malformed upload: {0}")]
    Multipart(String),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart(err.to_string())
    }
}

/// Pulls the first `file` part that carries a filename out of the form.
/// Other parts are drained and ignored. `Ok(None)` means the request had no
/// such part, including a body that is not multipart at all.
pub async fn read_file_field(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<Option<UploadedFile>, UploadError> {
    let mut upload = None;

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) if is_not_multipart(&err) => {
                log::debug!("Request body is not a multipart form: {}", err);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let (name, filename) = match field.content_disposition() {
            Some(disposition) => (
                disposition.get_name().map(str::to_owned),
                disposition.get_filename().map(str::to_owned),
            ),
            None => (None, None),
        };

        let wanted = upload.is_none() && name.as_deref() == Some(FILE_FIELD);
        let filename = match filename {
            Some(filename) if wanted => filename,
            _ => {
                while let Some(chunk) = field.next().await {
                    chunk?;
                }
                continue;
            }
        };

        let mut content = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if content.len() + data.len() > max_bytes {
                return Err(UploadError::TooLarge { limit: max_bytes });
            }
            content.extend_from_slice(&data);
        }

        log::debug!("Received upload {:?} ({} bytes)", filename, content.len());
        upload = Some(UploadedFile::new(filename, content));
    }

    Ok(upload)
}

fn is_not_multipart(err: &MultipartError) -> bool {
    matches!(
        err,
        MultipartError::ContentTypeMissing
            | MultipartError::ContentTypeParse
            | MultipartError::ContentTypeIncompatible
    )
}
