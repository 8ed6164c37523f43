mod chart;
mod comment;
mod dashboard;
mod dataset;
mod like;
mod user;

use sea_orm::EntityTrait;

/// Soft-delete capability shared by every table. The archived flag is a
/// plain two-state toggle; any state is reachable from any state.
pub(crate) trait Archivable: EntityTrait {
    fn id_column() -> Self::Column;
    fn archived_column() -> Self::Column;
}

pub(crate) use crate::persistence::chart::{ChartActiveModel, ChartColumn, ChartEntity};
pub(crate) use crate::persistence::comment::{CommentActiveModel, CommentColumn, CommentEntity};
pub(crate) use crate::persistence::dashboard::{
    DashboardActiveModel, DashboardColumn, DashboardEntity,
};
pub(crate) use crate::persistence::dataset::{DatasetActiveModel, DatasetColumn, DatasetEntity};
pub(crate) use crate::persistence::like::{LikeActiveModel, LikeColumn, LikeEntity};
pub(crate) use crate::persistence::user::{UserActiveModel, UserColumn, UserEntity, UserModel};
