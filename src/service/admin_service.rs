use crate::persistence::Archivable;
use crate::repository::admin_repository::AdminRepository;
use crate::service::error::{ServiceError, map_db_error};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, Order, Value as DbValue};
use serde_json::{Map, Value};
use std::{collections::HashMap, sync::Arc};

/// Admin list views are fixed at 20 rows per page.
pub(crate) const ADMIN_PAGE_SIZE: u64 = 20;

/// Declarative console configuration for one entity: which columns the list
/// view shows, which are searchable/filterable, and the default ordering.
pub(crate) struct AdminConfig<E: Archivable> {
    pub(crate) resource_name: &'static str,
    pub(crate) list_display: &'static [&'static str],
    pub(crate) search_columns: &'static [E::Column],
    pub(crate) filter_columns: &'static [(&'static str, E::Column)],
    pub(crate) order_column: E::Column,
    pub(crate) order: Order,
    pub(crate) decorate: Option<fn(&mut Map<String, Value>)>,
}

impl<E: Archivable> Clone for AdminConfig<E> {
    fn clone(&self) -> Self {
        Self {
            resource_name: self.resource_name,
            list_display: self.list_display,
            search_columns: self.search_columns,
            filter_columns: self.filter_columns,
            order_column: self.order_column,
            order: self.order.clone(),
            decorate: self.decorate,
        }
    }
}

/// First 50 characters of a comment, with an ellipsis marker when truncated.
pub(crate) fn content_preview(content: &str) -> String {
    const PREVIEW_CHARS: usize = 50;

    if content.chars().count() <= PREVIEW_CHARS {
        return content.to_string();
    }

    let head: String = content.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// First 5 column names comma-joined, with an ellipsis marker when more
/// exist.
pub(crate) fn columns_preview(columns: &[Value]) -> String {
    const PREVIEW_COLUMNS: usize = 5;

    let names: Vec<&str> = columns.iter().filter_map(Value::as_str).collect();
    let shown = names
        .iter()
        .take(PREVIEW_COLUMNS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    if names.len() > PREVIEW_COLUMNS {
        format!("{shown}...")
    } else {
        shown
    }
}

pub(crate) fn decorate_comment_row(row: &mut Map<String, Value>) {
    if let Some(content) = row.get("content").and_then(Value::as_str) {
        let preview = content_preview(content);
        row.insert("content_preview".to_string(), Value::String(preview));
    }
}

pub(crate) fn decorate_dataset_row(row: &mut Map<String, Value>) {
    if let Some(columns) = row.get("columns").and_then(Value::as_array) {
        let preview = columns_preview(columns);
        row.insert("columns_preview".to_string(), Value::String(preview));
    }
}

/// Filter values arrive as raw query-string text; booleans and integers are
/// matched as such, everything else as string equality.
fn filter_value(raw: &str) -> DbValue {
    if raw.eq_ignore_ascii_case("true") {
        return true.into();
    }
    if raw.eq_ignore_ascii_case("false") {
        return false.into();
    }
    if let Ok(number) = raw.parse::<i64>() {
        return number.into();
    }
    raw.into()
}

pub(crate) struct AdminService<E: Archivable> {
    db: Arc<DatabaseConnection>,
    config: AdminConfig<E>,
}

impl<E: Archivable> Clone for AdminService<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            config: self.config.clone(),
        }
    }
}

impl<E> AdminService<E>
where
    E: Archivable + Send + Sync + 'static,
    E::Model: Send + Sync,
{
    pub(crate) fn new(db: Arc<DatabaseConnection>, config: AdminConfig<E>) -> Self {
        Self { db, config }
    }

    pub(crate) fn resource_name(&self) -> &'static str {
        self.config.resource_name
    }

    fn build_condition(&self, search: Option<&str>, filters: &HashMap<String, String>) -> Condition {
        let mut condition = Condition::all();

        if let Some(term) = search {
            let term = term.trim();
            if !term.is_empty() {
                let mut any = Condition::any();
                for column in self.config.search_columns {
                    any = any.add(column.contains(term));
                }
                condition = condition.add(any);
            }
        }

        for (name, column) in self.config.filter_columns {
            if let Some(raw) = filters.get(*name) {
                condition = condition.add(column.eq(filter_value(raw)));
            }
        }

        condition
    }

    fn project_row(&self, row: Value) -> Value {
        let Value::Object(mut object) = row else {
            return row;
        };

        if let Some(decorate) = self.config.decorate {
            decorate(&mut object);
        }

        let mut projected = Map::new();
        if let Some(id) = object.get("id") {
            projected.insert("id".to_string(), id.clone());
        }
        for key in self.config.list_display {
            if let Some(value) = object.get(*key) {
                projected.insert((*key).to_string(), value.clone());
            }
        }

        Value::Object(projected)
    }

    pub(crate) async fn list(
        &self,
        page: Option<u64>,
        search: Option<&str>,
        filters: &HashMap<String, String>,
    ) -> Result<Value, ServiceError> {
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1)
            .checked_mul(ADMIN_PAGE_SIZE)
            .ok_or_else(|| ServiceError::bad_request("page is too large"))?;

        let condition = self.build_condition(search, filters);
        let (rows, total) = AdminRepository::list_page::<E, _>(
            self.db.as_ref(),
            condition,
            self.config.order_column,
            self.config.order.clone(),
            ADMIN_PAGE_SIZE,
            offset,
        )
        .await
        .map_err(map_db_error)?;

        let items: Vec<Value> = rows.into_iter().map(|row| self.project_row(row)).collect();

        Ok(serde_json::json!({
            "items": items,
            "total": total,
            "page": page,
            "page_size": ADMIN_PAGE_SIZE,
        }))
    }

    /// Bulk action over the selected row set; a single update statement, so
    /// the operation is all-or-nothing at the database level.
    pub(crate) async fn set_archived(&self, ids: &[i32], archived: bool) -> Result<u64, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::bad_request(
                "field `ids` must be a non-empty array of integers",
            ));
        }

        AdminRepository::set_archived::<E, _>(self.db.as_ref(), ids, archived)
            .await
            .map_err(map_db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::{columns_preview, content_preview, filter_value};
    use crate::entity::{DashboardColumn, DashboardEntity};
    use crate::service::admin_service::{AdminConfig, AdminService};
    use crate::test_util::{connect_test_db, seed_dashboard, seed_dataset, seed_user};
    use sea_orm::{EntityTrait, Order};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[test]
    fn short_content_is_returned_unchanged() {
        assert_eq!(content_preview("short comment"), "short comment");
        assert_eq!(content_preview(&"x".repeat(50)), "x".repeat(50));
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "y".repeat(60);
        let preview = content_preview(&content);
        assert_eq!(preview, format!("{}...", "y".repeat(50)));
        assert_eq!(preview.chars().count(), 53);
    }

    #[test]
    fn few_columns_are_joined_without_ellipsis() {
        let columns: Vec<Value> = ["a", "b", "c"].iter().map(|name| json!(name)).collect();
        assert_eq!(columns_preview(&columns), "a, b, c");
    }

    #[test]
    fn many_columns_are_truncated_with_ellipsis() {
        let columns: Vec<Value> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(|name| json!(name))
            .collect();
        assert_eq!(columns_preview(&columns), "a, b, c, d, e...");
    }

    #[test]
    fn filter_values_are_typed() {
        assert_eq!(filter_value("true"), true.into());
        assert_eq!(filter_value("false"), false.into());
        assert_eq!(filter_value("42"), 42i64.into());
        assert_eq!(filter_value("google"), "google".into());
    }

    fn dashboards_config() -> AdminConfig<DashboardEntity> {
        AdminConfig {
            resource_name: "dashboards",
            list_display: &["title", "user_id", "is_public", "is_archived", "created_at"],
            search_columns: &[DashboardColumn::Title, DashboardColumn::Description],
            filter_columns: &[
                ("is_public", DashboardColumn::IsPublic),
                ("is_archived", DashboardColumn::IsArchived),
            ],
            order_column: DashboardColumn::CreatedAt,
            order: Order::Desc,
            decorate: None,
        }
    }

    #[tokio::test]
    async fn bulk_archive_touches_exactly_the_selected_rows() {
        let db = Arc::new(connect_test_db().await);
        let user_id = seed_user(db.as_ref(), "owner@example.com").await;
        let dataset_id = seed_dataset(db.as_ref(), Some(user_id)).await;

        let first = seed_dashboard(db.as_ref(), user_id, dataset_id).await;
        let second = seed_dashboard(db.as_ref(), user_id, dataset_id).await;
        let third = seed_dashboard(db.as_ref(), user_id, dataset_id).await;

        let service = AdminService::new(db.clone(), dashboards_config());

        let updated = service
            .set_archived(&[first, second], true)
            .await
            .expect("bulk archive should succeed");
        assert_eq!(updated, 2);

        let archived_flags: Vec<(i32, bool)> = DashboardEntity::find()
            .all(db.as_ref())
            .await
            .expect("load dashboards")
            .into_iter()
            .map(|dashboard| (dashboard.id, dashboard.is_archived))
            .collect();
        assert!(archived_flags.contains(&(first, true)));
        assert!(archived_flags.contains(&(second, true)));
        assert!(archived_flags.contains(&(third, false)));

        let reverted = service
            .set_archived(&[first, second], false)
            .await
            .expect("bulk unarchive should succeed");
        assert_eq!(reverted, 2);

        let unarchived = DashboardEntity::find()
            .all(db.as_ref())
            .await
            .expect("load dashboards");
        assert!(unarchived.iter().all(|dashboard| !dashboard.is_archived));
    }

    #[tokio::test]
    async fn list_searches_and_filters_rows() {
        let db = Arc::new(connect_test_db().await);
        let user_id = seed_user(db.as_ref(), "search@example.com").await;
        let dataset_id = seed_dataset(db.as_ref(), Some(user_id)).await;
        let first = seed_dashboard(db.as_ref(), user_id, dataset_id).await;
        let _second = seed_dashboard(db.as_ref(), user_id, dataset_id).await;

        let service = AdminService::new(db.clone(), dashboards_config());

        service
            .set_archived(&[first], true)
            .await
            .expect("archive one dashboard");

        let mut filters = HashMap::new();
        filters.insert("is_archived".to_string(), "true".to_string());
        let page = service
            .list(None, None, &filters)
            .await
            .expect("filtered list should succeed");

        assert_eq!(page["total"], json!(1));
        assert_eq!(page["page_size"], json!(20));
        assert_eq!(page["items"][0]["id"], json!(first));

        let no_match = service
            .list(None, Some("no such title"), &HashMap::new())
            .await
            .expect("searched list should succeed");
        assert_eq!(no_match["total"], json!(0));
    }
}
