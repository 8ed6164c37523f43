use crate::entity::{DashboardEntity, DatasetEntity, UserEntity};
use crate::persistence::Archivable;
use crate::repository::resource_repository::ResourceRepository;
use crate::service::error::{ServiceError, map_db_error};
use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, TransactionTrait, TryIntoModel,
};
use serde_json::Value;
use std::{marker::PhantomData, sync::Arc};

/// Which server-managed timestamp fields an entity carries.
#[derive(Clone, Copy)]
pub(crate) enum TimestampPolicy {
    None,
    UploadedOnly,
    CreatedOnly,
    CreatedAndUpdated,
}

/// Entity-specific payload rules: required fields, shape checks, and which
/// foreign keys must point at existing rows.
#[derive(Clone, Copy)]
pub(crate) enum PayloadPolicy {
    Dataset,
    Dashboard,
    Chart,
    Like,
    Comment,
}

fn resource_not_found(resource_name: &'static str, id: i32) -> ServiceError {
    ServiceError::not_found(format!("{resource_name} with id={id} was not found"))
}

fn strip_id_key(payload: &mut Value) {
    if let Some(object) = payload.as_object_mut() {
        object.remove("id");
    }
}

fn apply_server_timestamps(payload: &mut Value, policy: TimestampPolicy, is_update: bool) {
    let Some(object) = payload.as_object_mut() else {
        return;
    };

    object.remove("created_at");
    object.remove("updated_at");
    object.remove("uploaded_at");

    let now = Utc::now().to_rfc3339();
    match policy {
        TimestampPolicy::None => {}
        TimestampPolicy::UploadedOnly => {
            if !is_update {
                object.insert("uploaded_at".to_string(), Value::String(now));
            }
        }
        TimestampPolicy::CreatedOnly => {
            if !is_update {
                object.insert("created_at".to_string(), Value::String(now));
            }
        }
        TimestampPolicy::CreatedAndUpdated => {
            if !is_update {
                object.insert("created_at".to_string(), Value::String(now.clone()));
            }
            object.insert("updated_at".to_string(), Value::String(now));
        }
    }
}

fn payload_as_object(payload: &Value) -> Result<&serde_json::Map<String, Value>, ServiceError> {
    payload
        .as_object()
        .ok_or_else(|| ServiceError::bad_request("request payload must be a JSON object"))
}

fn parse_i32_field(
    payload: &Value,
    field_name: &'static str,
    required: bool,
) -> Result<Option<i32>, ServiceError> {
    let object = payload_as_object(payload)?;

    match object.get(field_name) {
        None => {
            if required {
                return Err(ServiceError::bad_request(format!(
                    "missing required field `{field_name}`"
                )));
            }
            Ok(None)
        }
        Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            let raw = number.as_i64().ok_or_else(|| {
                ServiceError::bad_request(format!("field `{field_name}` must be a valid integer"))
            })?;
            let id = i32::try_from(raw).map_err(|_| {
                ServiceError::bad_request(format!("field `{field_name}` is out of i32 range"))
            })?;
            Ok(Some(id))
        }
        Some(_) => Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be an integer or null"
        ))),
    }
}

fn require_non_empty_string(payload: &Value, field_name: &'static str) -> Result<(), ServiceError> {
    let object = payload_as_object(payload)?;

    let Some(value) = object.get(field_name) else {
        return Err(ServiceError::bad_request(format!(
            "missing required field `{field_name}`"
        )));
    };
    let Some(text) = value.as_str() else {
        return Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be a non-empty string"
        )));
    };
    if text.trim().is_empty() {
        return Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be a non-empty string"
        )));
    }

    Ok(())
}

fn string_array_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    field_name: &'static str,
) -> Result<Option<&'a Vec<Value>>, ServiceError> {
    match object.get(field_name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            if items.iter().any(|item| !item.is_string()) {
                return Err(ServiceError::bad_request(format!(
                    "field `{field_name}` must be an array of strings"
                )));
            }
            Ok(Some(items))
        }
        Some(_) => Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be an array of strings"
        ))),
    }
}

/// Shape rules for a dataset payload. Column names and types are
/// parallel-indexed, so their lengths must match when both are present.
fn validate_dataset_shape(payload: &Value) -> Result<(), ServiceError> {
    require_non_empty_string(payload, "filename")?;

    let object = payload_as_object(payload)?;
    let Some(columns) = string_array_field(object, "columns")? else {
        return Err(ServiceError::bad_request("missing required field `columns`"));
    };

    if let Some(column_types) = string_array_field(object, "column_types")?
        && column_types.len() != columns.len()
    {
        return Err(ServiceError::bad_request(
            "field `column_types` must have the same length as `columns`",
        ));
    }

    match object.get("data") {
        None | Some(Value::Null) => Err(ServiceError::bad_request("missing required field `data`")),
        Some(_) => Ok(()),
    }
}

fn validate_chart_shape(payload: &Value) -> Result<(), ServiceError> {
    require_non_empty_string(payload, "title")?;
    require_non_empty_string(payload, "chart_type")?;

    let display_order = parse_i32_field(payload, "display_order", true)?;
    if let Some(display_order) = display_order
        && display_order < 0
    {
        return Err(ServiceError::bad_request(
            "field `display_order` must be a non-negative integer",
        ));
    }

    Ok(())
}

async fn ensure_reference_exists<E, C>(
    db: &C,
    id: i32,
    field_name: &'static str,
) -> Result<(), ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let exists = ResourceRepository::find_model_by_id::<E, _>(db, id)
        .await
        .map_err(map_db_error)?
        .is_some();

    if !exists {
        return Err(ServiceError::bad_request(format!(
            "invalid `{field_name}`: referenced record {id} not found"
        )));
    }

    Ok(())
}

async fn ensure_engagement_references(
    db: &impl ConnectionTrait,
    payload: &Value,
) -> Result<(), ServiceError> {
    let user_id = parse_i32_field(payload, "user_id", true)?;
    if let Some(user_id) = user_id {
        ensure_reference_exists::<UserEntity, _>(db, user_id, "user_id").await?;
    }

    let dashboard_id = parse_i32_field(payload, "dashboard_id", true)?;
    if let Some(dashboard_id) = dashboard_id {
        ensure_reference_exists::<DashboardEntity, _>(db, dashboard_id, "dashboard_id").await?;
    }

    Ok(())
}

async fn validate_payload(
    db: &impl ConnectionTrait,
    payload: &Value,
    payload_policy: PayloadPolicy,
) -> Result<(), ServiceError> {
    match payload_policy {
        PayloadPolicy::Dataset => {
            validate_dataset_shape(payload)?;

            let user_id = parse_i32_field(payload, "user_id", false)?;
            if let Some(user_id) = user_id {
                ensure_reference_exists::<UserEntity, _>(db, user_id, "user_id").await?;
            }

            Ok(())
        }
        PayloadPolicy::Dashboard => {
            require_non_empty_string(payload, "title")?;

            let user_id = parse_i32_field(payload, "user_id", true)?;
            if let Some(user_id) = user_id {
                ensure_reference_exists::<UserEntity, _>(db, user_id, "user_id").await?;
            }

            let dataset_id = parse_i32_field(payload, "dataset_id", true)?;
            if let Some(dataset_id) = dataset_id {
                ensure_reference_exists::<DatasetEntity, _>(db, dataset_id, "dataset_id").await?;
            }

            Ok(())
        }
        PayloadPolicy::Chart => {
            validate_chart_shape(payload)?;

            let dashboard_id = parse_i32_field(payload, "dashboard_id", true)?;
            if let Some(dashboard_id) = dashboard_id {
                ensure_reference_exists::<DashboardEntity, _>(db, dashboard_id, "dashboard_id")
                    .await?;
            }

            Ok(())
        }
        PayloadPolicy::Like => ensure_engagement_references(db, payload).await,
        PayloadPolicy::Comment => {
            require_non_empty_string(payload, "content")?;
            ensure_engagement_references(db, payload).await
        }
    }
}

fn merge_payload_with_existing(
    mut existing_payload: Value,
    update_payload: &Value,
) -> Result<Value, ServiceError> {
    let Some(existing_object) = existing_payload.as_object_mut() else {
        return Err(ServiceError::internal(
            "failed to serialize existing record as JSON object",
        ));
    };

    let Some(update_object) = update_payload.as_object() else {
        return Err(ServiceError::bad_request(
            "request payload must be a JSON object",
        ));
    };

    for (key, value) in update_object {
        existing_object.insert(key.clone(), value.clone());
    }

    Ok(existing_payload)
}

#[derive(Clone)]
pub(crate) struct ResourceService<E, A> {
    db: Arc<DatabaseConnection>,
    resource_name: &'static str,
    timestamp_policy: TimestampPolicy,
    payload_policy: PayloadPolicy,
    _marker: PhantomData<fn() -> (E, A)>,
}

impl<E, A> ResourceService<E, A> {
    pub(crate) fn new(
        db: Arc<DatabaseConnection>,
        resource_name: &'static str,
        timestamp_policy: TimestampPolicy,
        payload_policy: PayloadPolicy,
    ) -> Self {
        Self {
            db,
            resource_name,
            timestamp_policy,
            payload_policy,
            _marker: PhantomData,
        }
    }
}

impl<E, A> ResourceService<E, A>
where
    E: Archivable + Send + Sync + 'static,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + TryIntoModel<E::Model> + Send + 'static,
    E::Model: IntoActiveModel<A> + serde::Serialize + for<'de> serde::Deserialize<'de> + Send,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    pub(crate) async fn list(
        &self,
        page: Option<u64>,
        page_size: Option<u64>,
    ) -> Result<Value, ServiceError> {
        let page_size = page_size.unwrap_or(20).clamp(1, 200);
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1).checked_mul(page_size).ok_or_else(|| {
            ServiceError::bad_request("page and page_size combination is too large")
        })?;

        let records = ResourceRepository::list_records::<E, _>(self.db.as_ref(), page_size, offset)
            .await
            .map_err(map_db_error)?;

        Ok(serde_json::json!({
            "items": records,
            "page": page,
            "page_size": page_size,
        }))
    }

    pub(crate) async fn get(&self, id: i32) -> Result<Value, ServiceError> {
        let record = ResourceRepository::find_json_by_id::<E, _>(self.db.as_ref(), id)
            .await
            .map_err(map_db_error)?;

        record.ok_or_else(|| resource_not_found(self.resource_name, id))
    }

    pub(crate) async fn create(&self, mut payload: Value) -> Result<Value, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;

        strip_id_key(&mut payload);
        apply_server_timestamps(&mut payload, self.timestamp_policy, false);
        validate_payload(&txn, &payload, self.payload_policy).await?;

        let created = ResourceRepository::insert_from_json_and_reload::<E, A, _>(&txn, payload)
            .await
            .map_err(map_db_error)?;

        let Some(created) = created else {
            return Err(ServiceError::internal(format!(
                "failed to reload newly created {}",
                self.resource_name
            )));
        };

        txn.commit().await.map_err(map_db_error)?;

        Ok(created)
    }

    pub(crate) async fn update(&self, id: i32, mut payload: Value) -> Result<Value, ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;

        let existing = ResourceRepository::find_model_by_id::<E, _>(&txn, id)
            .await
            .map_err(map_db_error)?;

        let Some(existing) = existing else {
            return Err(resource_not_found(self.resource_name, id));
        };

        let existing_payload = serde_json::to_value(&existing).map_err(|error| {
            ServiceError::internal(format!("failed to serialize existing record: {error}"))
        })?;

        strip_id_key(&mut payload);
        apply_server_timestamps(&mut payload, self.timestamp_policy, true);

        let merged_payload = merge_payload_with_existing(existing_payload, &payload)?;
        validate_payload(&txn, &merged_payload, self.payload_policy).await?;

        ResourceRepository::update_from_json::<E, A, _>(&txn, existing, payload)
            .await
            .map_err(map_db_error)?;

        let updated = ResourceRepository::find_json_by_id::<E, _>(&txn, id)
            .await
            .map_err(map_db_error)?;

        let Some(updated) = updated else {
            return Err(resource_not_found(self.resource_name, id));
        };

        txn.commit().await.map_err(map_db_error)?;
        Ok(updated)
    }

    pub(crate) async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(map_db_error)?;

        let existing = ResourceRepository::find_model_by_id::<E, _>(&txn, id)
            .await
            .map_err(map_db_error)?;
        if existing.is_none() {
            return Err(resource_not_found(self.resource_name, id));
        }

        let rows_affected = ResourceRepository::delete_by_id::<E, _>(&txn, id)
            .await
            .map_err(map_db_error)?;
        if rows_affected == 0 {
            return Err(resource_not_found(self.resource_name, id));
        }

        txn.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_chart_shape, validate_dataset_shape};
    use crate::entity::{DashboardActiveModel, LikeActiveModel, LikeEntity};
    use crate::service::error::ServiceErrorKind;
    use crate::service::resource_service::{PayloadPolicy, ResourceService, TimestampPolicy};
    use crate::test_util::{connect_test_db, seed_dashboard, seed_dataset, seed_user};
    use sea_orm::EntityTrait;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn dataset_shape_requires_columns_and_data() {
        let error = validate_dataset_shape(&json!({
            "filename": "sales.csv",
            "data": [],
        }))
        .expect_err("columns must be required");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);

        let error = validate_dataset_shape(&json!({
            "filename": "sales.csv",
            "columns": ["region", "revenue"],
        }))
        .expect_err("data must be required");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }

    #[test]
    fn dataset_shape_rejects_mismatched_column_types() {
        let error = validate_dataset_shape(&json!({
            "filename": "sales.csv",
            "columns": ["region", "revenue"],
            "column_types": ["text"],
            "data": [],
        }))
        .expect_err("column_types length must match columns");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }

    #[test]
    fn dataset_shape_accepts_missing_column_types() {
        validate_dataset_shape(&json!({
            "filename": "sales.csv",
            "columns": ["region", "revenue"],
            "data": [{"region": "EMEA", "revenue": 10}],
        }))
        .expect("column_types should be optional");
    }

    #[test]
    fn chart_shape_rejects_negative_display_order() {
        let error = validate_chart_shape(&json!({
            "title": "Revenue by region",
            "chart_type": "bar",
            "display_order": -1,
        }))
        .expect_err("negative display_order must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn duplicate_like_pair_is_a_conflict() {
        let db = Arc::new(connect_test_db().await);
        let user_id = seed_user(db.as_ref(), "liker@example.com").await;
        let dataset_id = seed_dataset(db.as_ref(), Some(user_id)).await;
        let dashboard_id = seed_dashboard(db.as_ref(), user_id, dataset_id).await;

        let service = ResourceService::<LikeEntity, LikeActiveModel>::new(
            db.clone(),
            "like",
            TimestampPolicy::CreatedOnly,
            PayloadPolicy::Like,
        );

        let payload = json!({"user_id": user_id, "dashboard_id": dashboard_id});
        service
            .create(payload.clone())
            .await
            .expect("first like should be created");

        let error = service
            .create(payload)
            .await
            .expect_err("second like for the same pair must fail");
        assert_eq!(error.kind(), ServiceErrorKind::Conflict);
    }

    #[tokio::test]
    async fn dashboard_create_requires_existing_references() {
        let db = Arc::new(connect_test_db().await);

        let service = ResourceService::<
            crate::entity::DashboardEntity,
            DashboardActiveModel,
        >::new(
            db,
            "dashboard",
            TimestampPolicy::CreatedAndUpdated,
            PayloadPolicy::Dashboard,
        );

        let error = service
            .create(json!({
                "title": "Quarterly revenue",
                "user_id": 42,
                "dataset_id": 7,
            }))
            .await
            .expect_err("dangling references must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn like_create_stamps_created_at_server_side() {
        let db = Arc::new(connect_test_db().await);
        let user_id = seed_user(db.as_ref(), "stamp@example.com").await;
        let dataset_id = seed_dataset(db.as_ref(), Some(user_id)).await;
        let dashboard_id = seed_dashboard(db.as_ref(), user_id, dataset_id).await;

        let service = ResourceService::<LikeEntity, LikeActiveModel>::new(
            db.clone(),
            "like",
            TimestampPolicy::CreatedOnly,
            PayloadPolicy::Like,
        );

        let created = service
            .create(json!({
                "user_id": user_id,
                "dashboard_id": dashboard_id,
                "created_at": "1999-01-01T00:00:00Z",
            }))
            .await
            .expect("like should be created");

        let id = created["id"].as_i64().expect("created id") as i32;
        let stored = LikeEntity::find_by_id(id)
            .one(db.as_ref())
            .await
            .expect("query like")
            .expect("like row");
        assert!(stored.created_at.timestamp() > 946684800); // not the client-sent year 1999
    }
}
