pub(crate) mod account_handler;
pub(crate) mod admin_handler;
mod error_mapper;
pub(crate) mod health_handler;
pub(crate) mod media_handler;
pub(crate) mod resource_handler;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common_http_server_rs::ApiResponse;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};

pub(crate) fn api_v1_router(db: Arc<DatabaseConnection>, media_root: Arc<PathBuf>) -> Router {
    Router::new()
        .merge(account_handler::router(db.clone()))
        .merge(media_handler::router(media_root))
        .merge(resource_handler::router(db))
}

pub(super) fn success_response<T: Serialize>(status: StatusCode, data: T) -> Response {
    ApiResponse::success_with_status(data, status).into_response()
}
