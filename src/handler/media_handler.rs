use crate::handler::success_response;
use crate::service::error::ServiceError;
use crate::service::media_service::{MediaService, MediaUpload};
use axum::{Router, extract::Multipart, http::StatusCode, response::Response, routing::post};
use std::{path::PathBuf, sync::Arc};

async fn parse_upload(mut multipart: Multipart) -> Result<MediaUpload, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ServiceError::bad_request(format!("invalid multipart payload: {error}")))?
    {
        let field_name = field.name().map(str::to_owned).unwrap_or_default();
        if field_name != "file" {
            continue;
        }

        let original_filename = field
            .file_name()
            .map(str::to_owned)
            .unwrap_or_else(|| "upload.bin".to_string());
        let mime_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|error| {
            ServiceError::bad_request(format!("failed to read upload: {error}"))
        })?;

        return Ok(MediaUpload {
            original_filename,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(ServiceError::bad_request("missing multipart field `file`"))
}

pub(crate) fn router(media_root: Arc<PathBuf>) -> Router {
    let service = MediaService::new(media_root);
    Router::new().route(
        "/media/upload",
        post(move |multipart: Multipart| upload_media(service.clone(), multipart)),
    )
}

async fn upload_media(
    service: MediaService,
    multipart: Multipart,
) -> Result<Response, ServiceError> {
    let upload = parse_upload(multipart).await?;
    let stored = service.store(upload).await?;
    Ok(success_response(StatusCode::CREATED, stored))
}
