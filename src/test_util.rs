use crate::entity::{
    CommentActiveModel, DashboardActiveModel, DatasetActiveModel, LikeActiveModel, UserActiveModel,
};
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection,
};

/// Fresh in-memory SQLite database with the full schema applied. The pool is
/// pinned to one connection so every query sees the same in-memory database.
pub(crate) async fn connect_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub(crate) async fn seed_user(db: &DatabaseConnection, email: &str) -> i32 {
    let now = Utc::now();
    let user = UserActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$test-only-hash".to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        is_staff: Set(false),
        is_superuser: Set(false),
        is_archived: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    user.insert(db).await.expect("insert user").id
}

pub(crate) async fn seed_dataset(db: &DatabaseConnection, user_id: Option<i32>) -> i32 {
    let dataset = DatasetActiveModel {
        user_id: Set(user_id),
        filename: Set("sales.csv".to_string()),
        columns: Set(serde_json::json!(["region", "revenue"])),
        column_types: Set(Some(serde_json::json!(["text", "number"]))),
        data: Set(serde_json::json!([{"region": "EMEA", "revenue": 10}])),
        uploaded_at: Set(Utc::now().into()),
        is_archived: Set(false),
        ..Default::default()
    };

    dataset.insert(db).await.expect("insert dataset").id
}

pub(crate) async fn seed_dashboard(db: &DatabaseConnection, user_id: i32, dataset_id: i32) -> i32 {
    let now = Utc::now();
    let dashboard = DashboardActiveModel {
        user_id: Set(user_id),
        dataset_id: Set(dataset_id),
        title: Set("Quarterly revenue".to_string()),
        is_public: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        is_archived: Set(false),
        ..Default::default()
    };

    dashboard.insert(db).await.expect("insert dashboard").id
}

pub(crate) async fn seed_like(db: &DatabaseConnection, user_id: i32, dashboard_id: i32) -> i32 {
    let like = LikeActiveModel {
        user_id: Set(user_id),
        dashboard_id: Set(dashboard_id),
        created_at: Set(Utc::now().into()),
        is_archived: Set(false),
        ..Default::default()
    };

    like.insert(db).await.expect("insert like").id
}

pub(crate) async fn seed_comment(db: &DatabaseConnection, user_id: i32, dashboard_id: i32) -> i32 {
    let comment = CommentActiveModel {
        user_id: Set(user_id),
        dashboard_id: Set(dashboard_id),
        content: Set("Looks great!".to_string()),
        created_at: Set(Utc::now().into()),
        is_archived: Set(false),
        ..Default::default()
    };

    comment.insert(db).await.expect("insert comment").id
}
