pub(crate) use crate::persistence::{
    ChartActiveModel, ChartColumn, ChartEntity, CommentActiveModel, CommentColumn, CommentEntity,
    DashboardActiveModel, DashboardColumn, DashboardEntity, DatasetActiveModel, DatasetColumn,
    DatasetEntity, LikeActiveModel, LikeColumn, LikeEntity, UserActiveModel, UserColumn,
    UserEntity, UserModel,
};
