use crate::service::error::ServiceError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::{path::PathBuf, sync::Arc};
use uuid::Uuid;

pub(crate) struct MediaUpload {
    pub(crate) original_filename: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) bytes: Vec<u8>,
}

/// Stored file descriptor; `path` is relative to the media root and is what
/// image columns (`profile_image`, `preview_image`) persist.
#[derive(Debug, Serialize)]
pub(crate) struct StoredMedia {
    pub(crate) path: String,
    pub(crate) original_filename: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) byte_size: u64,
    pub(crate) sha256: String,
}

#[derive(Clone)]
pub(crate) struct MediaService {
    media_root: Arc<PathBuf>,
}

impl MediaService {
    pub(crate) fn new(media_root: Arc<PathBuf>) -> Self {
        Self { media_root }
    }

    pub(crate) async fn store(&self, upload: MediaUpload) -> Result<StoredMedia, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::bad_request("uploaded file is empty"));
        }

        let file_name = Uuid::new_v4().simple().to_string();
        let target_path = self.media_root.join(&file_name);

        tokio::fs::write(&target_path, &upload.bytes)
            .await
            .map_err(|error| {
                ServiceError::internal(format!("failed to persist uploaded file: {error}"))
            })?;

        let sha256 = format!("{:x}", Sha256::digest(&upload.bytes));

        Ok(StoredMedia {
            path: file_name,
            original_filename: upload.original_filename,
            mime_type: upload.mime_type,
            byte_size: upload.bytes.len() as u64,
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MediaService, MediaUpload};
    use crate::service::error::ServiceErrorKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn empty_uploads_are_rejected() {
        let dir = std::env::temp_dir().join("boardshare-media-test");
        tokio::fs::create_dir_all(&dir).await.expect("create temp dir");
        let service = MediaService::new(Arc::new(dir));

        let error = service
            .store(MediaUpload {
                original_filename: "empty.png".to_string(),
                mime_type: Some("image/png".to_string()),
                bytes: Vec::new(),
            })
            .await
            .expect_err("empty upload must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn stored_files_report_size_and_digest() {
        let dir = std::env::temp_dir().join("boardshare-media-test");
        tokio::fs::create_dir_all(&dir).await.expect("create temp dir");
        let service = MediaService::new(Arc::new(dir.clone()));

        let stored = service
            .store(MediaUpload {
                original_filename: "avatar.png".to_string(),
                mime_type: Some("image/png".to_string()),
                bytes: b"not really a png".to_vec(),
            })
            .await
            .expect("upload should be stored");

        assert_eq!(stored.byte_size, 16);
        assert_eq!(stored.original_filename, "avatar.png");
        assert!(dir.join(&stored.path).exists());

        tokio::fs::remove_file(dir.join(&stored.path))
            .await
            .expect("clean up stored file");
    }
}
