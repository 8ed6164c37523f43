use crate::entity::{UserActiveModel, UserModel};
use crate::repository::account_repository::AccountRepository;
use crate::service::error::{ServiceError, map_db_error};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{ActiveValue::Set, DatabaseConnection, IntoActiveModel};
use serde_json::{Map, Value};
use std::sync::Arc;

fn user_not_found(id: i32) -> ServiceError {
    ServiceError::not_found(format!("user with id={id} was not found"))
}

fn payload_as_object(payload: &Value) -> Result<&Map<String, Value>, ServiceError> {
    payload
        .as_object()
        .ok_or_else(|| ServiceError::bad_request("request payload must be a JSON object"))
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| ServiceError::internal(format!("failed to hash password: {error}")))
}

fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

/// Users without an email address must be rejected before any write occurs.
fn required_email(object: &Map<String, Value>) -> Result<String, ServiceError> {
    let Some(value) = object.get("email") else {
        return Err(ServiceError::bad_request("users must have an email address"));
    };
    let Some(email) = value.as_str() else {
        return Err(ServiceError::bad_request("users must have an email address"));
    };

    let email = email.trim();
    if email.is_empty() {
        return Err(ServiceError::bad_request("users must have an email address"));
    }
    if !is_plausible_email(email) {
        return Err(ServiceError::bad_request(
            "field `email` must be a valid email address",
        ));
    }

    Ok(email.to_string())
}

fn required_password(object: &Map<String, Value>) -> Result<String, ServiceError> {
    let password = object
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if password.is_empty() {
        return Err(ServiceError::bad_request("missing required field `password`"));
    }

    Ok(password.to_string())
}

fn optional_string(
    object: &Map<String, Value>,
    field_name: &'static str,
) -> Result<Option<String>, ServiceError> {
    match object.get(field_name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be a string or null",
        ))),
    }
}

fn optional_bool(
    object: &Map<String, Value>,
    field_name: &'static str,
) -> Result<Option<bool>, ServiceError> {
    match object.get(field_name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(ServiceError::bad_request(format!(
            "field `{field_name}` must be a boolean",
        ))),
    }
}

/// Superusers must carry both permission flags; an explicit `false` for
/// either flag is an error.
fn ensure_superuser_flags(object: &Map<String, Value>) -> Result<(), ServiceError> {
    for flag in ["is_staff", "is_superuser"] {
        if let Some(value) = object.get(flag)
            && value.as_bool() != Some(true)
        {
            return Err(ServiceError::bad_request(format!(
                "superuser must have `{flag}` set to true"
            )));
        }
    }
    Ok(())
}

fn user_to_json(user: UserModel) -> Result<Value, ServiceError> {
    serde_json::to_value(user)
        .map_err(|error| ServiceError::internal(format!("failed to serialize user: {error}")))
}

#[derive(Clone)]
pub(crate) struct AccountService {
    db: Arc<DatabaseConnection>,
}

impl AccountService {
    pub(crate) fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

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

        let users = AccountRepository::list(self.db.as_ref(), page_size, offset)
            .await
            .map_err(map_db_error)?;
        let items = users
            .into_iter()
            .map(user_to_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(serde_json::json!({
            "items": items,
            "page": page,
            "page_size": page_size,
        }))
    }

    pub(crate) async fn get(&self, id: i32) -> Result<Value, ServiceError> {
        let user = AccountRepository::find_by_id(self.db.as_ref(), id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| user_not_found(id))?;

        user_to_json(user)
    }

    pub(crate) async fn create(&self, payload: Value) -> Result<Value, ServiceError> {
        self.create_with_flags(payload, false).await
    }

    /// Superuser creation additionally forces both permission flags to true.
    pub(crate) async fn create_superuser(&self, payload: Value) -> Result<Value, ServiceError> {
        self.create_with_flags(payload, true).await
    }

    async fn create_with_flags(
        &self,
        payload: Value,
        superuser: bool,
    ) -> Result<Value, ServiceError> {
        let object = payload_as_object(&payload)?;

        // Everything is validated before the first write.
        let email = required_email(object)?;
        let password = required_password(object)?;
        if superuser {
            ensure_superuser_flags(object)?;
        }

        let first_name = optional_string(object, "first_name")?.unwrap_or_default();
        let last_name = optional_string(object, "last_name")?.unwrap_or_default();
        let profile_image = optional_string(object, "profile_image")?;
        let provider = optional_string(object, "provider")?;
        let provider_account_id = optional_string(object, "provider_account_id")?;
        let is_staff = optional_bool(object, "is_staff")?.unwrap_or(false);
        let is_superuser = optional_bool(object, "is_superuser")?.unwrap_or(false);

        let existing = AccountRepository::find_by_email(self.db.as_ref(), &email)
            .await
            .map_err(map_db_error)?;
        if existing.is_some() {
            return Err(ServiceError::conflict(format!(
                "user with email={email} already exists"
            )));
        }

        let password_hash = hash_password(&password)?;
        let now = Utc::now();
        let user = UserActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            profile_image: Set(profile_image),
            provider: Set(provider),
            provider_account_id: Set(provider_account_id),
            is_staff: Set(superuser || is_staff),
            is_superuser: Set(superuser || is_superuser),
            is_archived: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = AccountRepository::insert(self.db.as_ref(), user)
            .await
            .map_err(map_db_error)?;

        user_to_json(created)
    }

    pub(crate) async fn update(&self, id: i32, payload: Value) -> Result<Value, ServiceError> {
        let object = payload_as_object(&payload)?;

        let existing = AccountRepository::find_by_id(self.db.as_ref(), id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| user_not_found(id))?;

        let mut user = existing.into_active_model();

        if object.contains_key("email") {
            user.email = Set(required_email(object)?);
        }
        if let Some(password) = optional_string(object, "password")? {
            if password.is_empty() {
                return Err(ServiceError::bad_request(
                    "field `password` must be a non-empty string",
                ));
            }
            user.password_hash = Set(hash_password(&password)?);
        }
        if let Some(first_name) = optional_string(object, "first_name")? {
            user.first_name = Set(first_name);
        }
        if let Some(last_name) = optional_string(object, "last_name")? {
            user.last_name = Set(last_name);
        }
        if object.contains_key("profile_image") {
            user.profile_image = Set(optional_string(object, "profile_image")?);
        }
        if object.contains_key("provider") {
            user.provider = Set(optional_string(object, "provider")?);
        }
        if object.contains_key("provider_account_id") {
            user.provider_account_id = Set(optional_string(object, "provider_account_id")?);
        }
        if let Some(is_staff) = optional_bool(object, "is_staff")? {
            user.is_staff = Set(is_staff);
        }
        if let Some(is_superuser) = optional_bool(object, "is_superuser")? {
            user.is_superuser = Set(is_superuser);
        }
        if let Some(is_archived) = optional_bool(object, "is_archived")? {
            user.is_archived = Set(is_archived);
        }
        user.updated_at = Set(Utc::now().into());

        let updated = AccountRepository::update(self.db.as_ref(), user)
            .await
            .map_err(map_db_error)?;

        user_to_json(updated)
    }

    pub(crate) async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let rows_affected = AccountRepository::delete_by_id(self.db.as_ref(), id)
            .await
            .map_err(map_db_error)?;

        if rows_affected == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::AccountService;
    use crate::entity::{
        CommentEntity, DashboardEntity, DatasetEntity, LikeEntity, UserEntity,
    };
    use crate::service::error::ServiceErrorKind;
    use crate::test_util::{
        connect_test_db, seed_comment, seed_dashboard, seed_dataset, seed_like, seed_user,
    };
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn creating_a_user_without_email_fails_before_any_write() {
        let db = Arc::new(connect_test_db().await);
        let service = AccountService::new(db.clone());

        let error = service
            .create(json!({"password": "hunter2!"}))
            .await
            .expect_err("missing email must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);

        let users = UserEntity::find().all(db.as_ref()).await.expect("query users");
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let db = Arc::new(connect_test_db().await);
        let service = AccountService::new(db);

        let payload = json!({
            "email": "dup@example.com",
            "password": "hunter2!",
            "first_name": "Dana",
        });
        service
            .create(payload.clone())
            .await
            .expect("first user should be created");

        let error = service
            .create(payload)
            .await
            .expect_err("second user with the same email must fail");
        assert_eq!(error.kind(), ServiceErrorKind::Conflict);
    }

    #[tokio::test]
    async fn passwords_are_hashed_and_never_serialized() {
        let db = Arc::new(connect_test_db().await);
        let service = AccountService::new(db.clone());

        let created = service
            .create(json!({
                "email": "hash@example.com",
                "password": "correct horse battery staple",
            }))
            .await
            .expect("user should be created");

        assert!(created.get("password_hash").is_none());
        assert!(created.get("password").is_none());

        let stored = UserEntity::find()
            .filter(crate::entity::UserColumn::Email.eq("hash@example.com"))
            .one(db.as_ref())
            .await
            .expect("query user")
            .expect("user row");
        assert_ne!(stored.password_hash, "correct horse battery staple");

        let parsed = PasswordHash::new(&stored.password_hash).expect("parse stored hash");
        assert!(
            Argon2::default()
                .verify_password(b"correct horse battery staple", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn superuser_creation_forces_both_flags() {
        let db = Arc::new(connect_test_db().await);
        let service = AccountService::new(db);

        let error = service
            .create_superuser(json!({
                "email": "root@example.com",
                "password": "hunter2!",
                "is_staff": false,
            }))
            .await
            .expect_err("explicit is_staff=false must be rejected");
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);

        let created = service
            .create_superuser(json!({
                "email": "root@example.com",
                "password": "hunter2!",
            }))
            .await
            .expect("superuser should be created");
        assert_eq!(created["is_staff"], json!(true));
        assert_eq!(created["is_superuser"], json!(true));
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_owned_rows() {
        let db = Arc::new(connect_test_db().await);
        let service = AccountService::new(db.clone());

        let user_id = seed_user(db.as_ref(), "cascade@example.com").await;
        let dataset_id = seed_dataset(db.as_ref(), Some(user_id)).await;
        let dashboard_id = seed_dashboard(db.as_ref(), user_id, dataset_id).await;
        seed_like(db.as_ref(), user_id, dashboard_id).await;
        seed_comment(db.as_ref(), user_id, dashboard_id).await;

        service.delete(user_id).await.expect("delete user");

        assert!(
            DatasetEntity::find()
                .all(db.as_ref())
                .await
                .expect("query datasets")
                .is_empty()
        );
        assert!(
            DashboardEntity::find()
                .all(db.as_ref())
                .await
                .expect("query dashboards")
                .is_empty()
        );
        assert!(
            LikeEntity::find()
                .all(db.as_ref())
                .await
                .expect("query likes")
                .is_empty()
        );
        assert!(
            CommentEntity::find()
                .all(db.as_ref())
                .await
                .expect("query comments")
                .is_empty()
        );
    }
}
