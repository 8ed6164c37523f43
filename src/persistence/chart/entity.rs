use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = true)]
    pub id: i32,
    pub dashboard_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub chart_type: String,
    pub data: Json,
    pub config: Json,
    // Display sequence within the dashboard; not required to be unique.
    pub display_order: i32,
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
