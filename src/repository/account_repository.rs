use crate::entity::{UserActiveModel, UserColumn, UserEntity, UserModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

pub(crate) struct AccountRepository;

impl AccountRepository {
    pub(crate) async fn list<C>(
        db: &C,
        page_size: u64,
        offset: u64,
    ) -> Result<Vec<UserModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserEntity::find()
            .order_by_asc(UserColumn::Id)
            .limit(page_size)
            .offset(offset)
            .all(db)
            .await
    }

    pub(crate) async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<UserModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserEntity::find_by_id(id).one(db).await
    }

    pub(crate) async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<UserModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(db)
            .await
    }

    pub(crate) async fn insert<C>(db: &C, user: UserActiveModel) -> Result<UserModel, DbErr>
    where
        C: ConnectionTrait,
    {
        user.insert(db).await
    }

    pub(crate) async fn update<C>(db: &C, user: UserActiveModel) -> Result<UserModel, DbErr>
    where
        C: ConnectionTrait,
    {
        user.update(db).await
    }

    pub(crate) async fn delete_by_id<C>(db: &C, id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = UserEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
