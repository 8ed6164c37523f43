use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub filename: String,
    // Column names and types are parallel-indexed when both are present.
    pub columns: Json,
    pub column_types: Option<Json>,
    pub data: Json,
    pub uploaded_at: DateTimeWithTimeZone,
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
