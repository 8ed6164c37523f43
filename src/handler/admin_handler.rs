use crate::entity::{
    ChartColumn, ChartEntity, CommentColumn, CommentEntity, DashboardColumn, DashboardEntity,
    DatasetColumn, DatasetEntity, LikeColumn, LikeEntity, UserColumn, UserEntity,
};
use crate::handler::success_response;
use crate::persistence::Archivable;
use crate::service::admin_service::{
    AdminConfig, AdminService, decorate_comment_row, decorate_dataset_row,
};
use crate::service::error::ServiceError;
use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use sea_orm::{DatabaseConnection, Order};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

fn users_config() -> AdminConfig<UserEntity> {
    AdminConfig {
        resource_name: "users",
        list_display: &[
            "email",
            "first_name",
            "last_name",
            "is_archived",
            "is_superuser",
        ],
        search_columns: &[
            UserColumn::Email,
            UserColumn::FirstName,
            UserColumn::LastName,
        ],
        filter_columns: &[
            ("is_archived", UserColumn::IsArchived),
            ("is_superuser", UserColumn::IsSuperuser),
            ("provider", UserColumn::Provider),
        ],
        order_column: UserColumn::Email,
        order: Order::Asc,
        decorate: None,
    }
}

fn datasets_config() -> AdminConfig<DatasetEntity> {
    AdminConfig {
        resource_name: "datasets",
        list_display: &["filename", "uploaded_at", "is_archived", "columns_preview"],
        search_columns: &[DatasetColumn::Filename],
        filter_columns: &[
            ("is_archived", DatasetColumn::IsArchived),
            ("user_id", DatasetColumn::UserId),
        ],
        order_column: DatasetColumn::UploadedAt,
        order: Order::Desc,
        decorate: Some(decorate_dataset_row),
    }
}

fn dashboards_config() -> AdminConfig<DashboardEntity> {
    AdminConfig {
        resource_name: "dashboards",
        list_display: &[
            "title",
            "user_id",
            "is_public",
            "is_archived",
            "created_at",
            "updated_at",
        ],
        search_columns: &[DashboardColumn::Title, DashboardColumn::Description],
        filter_columns: &[
            ("is_public", DashboardColumn::IsPublic),
            ("is_archived", DashboardColumn::IsArchived),
            ("user_id", DashboardColumn::UserId),
        ],
        order_column: DashboardColumn::CreatedAt,
        order: Order::Desc,
        decorate: None,
    }
}

fn charts_config() -> AdminConfig<ChartEntity> {
    AdminConfig {
        resource_name: "charts",
        list_display: &["title", "dashboard_id", "is_archived"],
        search_columns: &[ChartColumn::Title, ChartColumn::Description],
        filter_columns: &[
            ("dashboard_id", ChartColumn::DashboardId),
            ("is_archived", ChartColumn::IsArchived),
        ],
        order_column: ChartColumn::DisplayOrder,
        order: Order::Asc,
        decorate: None,
    }
}

fn likes_config() -> AdminConfig<LikeEntity> {
    AdminConfig {
        resource_name: "likes",
        list_display: &["user_id", "dashboard_id", "created_at", "is_archived"],
        search_columns: &[],
        filter_columns: &[
            ("is_archived", LikeColumn::IsArchived),
            ("user_id", LikeColumn::UserId),
            ("dashboard_id", LikeColumn::DashboardId),
        ],
        order_column: LikeColumn::CreatedAt,
        order: Order::Desc,
        decorate: None,
    }
}

fn comments_config() -> AdminConfig<CommentEntity> {
    AdminConfig {
        resource_name: "comments",
        list_display: &[
            "user_id",
            "dashboard_id",
            "content_preview",
            "created_at",
            "is_archived",
        ],
        search_columns: &[CommentColumn::Content],
        filter_columns: &[
            ("is_archived", CommentColumn::IsArchived),
            ("user_id", CommentColumn::UserId),
            ("dashboard_id", CommentColumn::DashboardId),
        ],
        order_column: CommentColumn::CreatedAt,
        order: Order::Desc,
        decorate: Some(decorate_comment_row),
    }
}

pub(crate) fn router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .merge(admin_resource_router(db.clone(), users_config()))
        .merge(admin_resource_router(db.clone(), datasets_config()))
        .merge(admin_resource_router(db.clone(), dashboards_config()))
        .merge(admin_resource_router(db.clone(), charts_config()))
        .merge(admin_resource_router(db.clone(), likes_config()))
        .merge(admin_resource_router(db, comments_config()))
}

fn admin_resource_router<E>(db: Arc<DatabaseConnection>, config: AdminConfig<E>) -> Router
where
    E: Archivable + Send + Sync + 'static,
    E::Model: Send + Sync,
{
    let service = AdminService::new(db, config);

    let list_service = service.clone();
    let archive_service = service.clone();
    let unarchive_service = service.clone();

    let base_path = format!("/{}", service.resource_name());
    let archive_path = format!("{base_path}/archive");
    let unarchive_path = format!("{base_path}/unarchive");

    Router::new()
        .route(
            base_path.as_str(),
            get(move |Query(params): Query<HashMap<String, String>>| {
                list_rows(list_service.clone(), params)
            }),
        )
        .route(
            archive_path.as_str(),
            post(move |Json(payload): Json<Value>| {
                set_archived(archive_service.clone(), payload, true)
            }),
        )
        .route(
            unarchive_path.as_str(),
            post(move |Json(payload): Json<Value>| {
                set_archived(unarchive_service.clone(), payload, false)
            }),
        )
}

/// Selected row ids for a bulk action, e.g. `{"ids": [1, 2, 3]}`.
fn parse_selected_ids(payload: &Value) -> Result<Vec<i32>, ServiceError> {
    let ids = payload
        .get("ids")
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::bad_request("missing required field `ids`"))?;

    ids.iter()
        .map(|value| {
            value
                .as_i64()
                .and_then(|raw| i32::try_from(raw).ok())
                .ok_or_else(|| {
                    ServiceError::bad_request("field `ids` must contain only integer ids")
                })
        })
        .collect()
}

async fn list_rows<E>(
    service: AdminService<E>,
    params: HashMap<String, String>,
) -> Result<Response, ServiceError>
where
    E: Archivable + Send + Sync + 'static,
    E::Model: Send + Sync,
{
    let page = params.get("page").and_then(|raw| raw.parse().ok());
    let search = params.get("search").map(String::as_str);

    let data = service.list(page, search, &params).await?;
    Ok(success_response(StatusCode::OK, data))
}

async fn set_archived<E>(
    service: AdminService<E>,
    payload: Value,
    archived: bool,
) -> Result<Response, ServiceError>
where
    E: Archivable + Send + Sync + 'static,
    E::Model: Send + Sync,
{
    let ids = parse_selected_ids(&payload)?;
    let updated = service.set_archived(&ids, archived).await?;

    Ok(success_response(
        StatusCode::OK,
        serde_json::json!({ "updated": updated }),
    ))
}

#[cfg(test)]
mod tests {
    use super::parse_selected_ids;
    use crate::service::error::ServiceErrorKind;
    use serde_json::json;

    #[test]
    fn parses_integer_id_lists() {
        let ids = parse_selected_ids(&json!({"ids": [1, 2, 3]})).expect("ids should parse");
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_missing_or_non_integer_ids() {
        let error = parse_selected_ids(&json!({})).expect_err("missing ids must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);

        let error = parse_selected_ids(&json!({"ids": ["one"]}))
            .expect_err("non-integer ids must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }
}
