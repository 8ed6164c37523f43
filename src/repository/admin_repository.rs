use crate::persistence::Archivable;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde_json::Value;

pub(crate) struct AdminRepository;

impl AdminRepository {
    /// One page of an admin list view plus the total row count for the
    /// applied condition.
    pub(crate) async fn list_page<E, C>(
        db: &C,
        condition: Condition,
        order_column: E::Column,
        order: Order,
        page_size: u64,
        offset: u64,
    ) -> Result<(Vec<Value>, u64), DbErr>
    where
        E: Archivable,
        E::Model: Send + Sync,
        C: ConnectionTrait,
    {
        let filtered = E::find().filter(condition);
        let total = filtered.clone().count(db).await?;

        let rows = filtered
            .order_by(order_column, order)
            .order_by_asc(E::id_column())
            .limit(page_size)
            .offset(offset)
            .into_json()
            .all(db)
            .await?;

        Ok((rows, total))
    }

    /// Flip the archived flag on the selected row set in a single update
    /// statement.
    pub(crate) async fn set_archived<E, C>(
        db: &C,
        ids: &[i32],
        archived: bool,
    ) -> Result<u64, DbErr>
    where
        E: Archivable,
        C: ConnectionTrait,
    {
        let result = E::update_many()
            .col_expr(E::archived_column(), Expr::value(archived))
            .filter(E::id_column().is_in(ids.iter().copied()))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
