use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    // (user_id, dashboard_id) is unique; enforced by the migration index.
    pub user_id: i32,
    pub dashboard_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub is_archived: bool,
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
