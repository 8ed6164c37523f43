use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    // Holds argon2 digests only; plaintext never reaches this column.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub provider: Option<String>,
    pub provider_account_id: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_archived: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl crate::persistence::Archivable for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn archived_column() -> Column {
        Column::IsArchived
    }
}
