use crate::handler::success_response;
use crate::service::account_service::AccountService;
use crate::service::error::ServiceError;
use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u64>,
    page_size: Option<u64>,
}

pub(crate) fn router(db: Arc<DatabaseConnection>) -> Router {
    let service = AccountService::new(db);
    let list_service = service.clone();
    let create_service = service.clone();
    let superuser_service = service.clone();
    let get_service = service.clone();
    let update_service = service.clone();
    let delete_service = service;

    Router::new()
        .route(
            "/users",
            get(move |query: Query<ListQuery>| list_users(list_service.clone(), query)).post(
                move |Json(payload): Json<Value>| create_user(create_service.clone(), payload),
            ),
        )
        .route(
            "/users/superuser",
            post(move |Json(payload): Json<Value>| {
                create_superuser(superuser_service.clone(), payload)
            }),
        )
        .route(
            "/users/{id}",
            get(move |Path(id): Path<i32>| get_user(get_service.clone(), id))
                .put(move |Path(id): Path<i32>, Json(payload): Json<Value>| {
                    update_user(update_service.clone(), id, payload)
                })
                .delete(move |Path(id): Path<i32>| delete_user(delete_service.clone(), id)),
        )
}

async fn list_users(
    service: AccountService,
    Query(query): Query<ListQuery>,
) -> Result<Response, ServiceError> {
    let data = service.list(query.page, query.page_size).await?;
    Ok(success_response(StatusCode::OK, data))
}

async fn create_user(service: AccountService, payload: Value) -> Result<Response, ServiceError> {
    let data = service.create(payload).await?;
    Ok(success_response(StatusCode::CREATED, data))
}

async fn create_superuser(
    service: AccountService,
    payload: Value,
) -> Result<Response, ServiceError> {
    let data = service.create_superuser(payload).await?;
    Ok(success_response(StatusCode::CREATED, data))
}

async fn get_user(service: AccountService, id: i32) -> Result<Response, ServiceError> {
    let data = service.get(id).await?;
    Ok(success_response(StatusCode::OK, data))
}

async fn update_user(
    service: AccountService,
    id: i32,
    payload: Value,
) -> Result<Response, ServiceError> {
    let data = service.update(id, payload).await?;
    Ok(success_response(StatusCode::OK, data))
}

async fn delete_user(service: AccountService, id: i32) -> Result<Response, ServiceError> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
