use crate::handler::{admin_handler, api_v1_router, health_handler::ping};
use axum::routing::get;
use common_http_server_rs::{AppBuilder, AppConfig, Server, ServerConfig};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::{io, path::PathBuf, sync::Arc};

fn build_server(db: Arc<DatabaseConnection>, media_root: Arc<PathBuf>) -> Server {
    let app_config = AppConfig::new()
        .with_logging(true)
        .with_tracing(true)
        .with_cors(true);

    let app_builder = AppBuilder::new(app_config)
        .route("/ping", get(ping))
        .nest("/api/v1", api_v1_router(db.clone(), media_root))
        .nest("/admin", admin_handler::router(db));

    let server_config = ServerConfig::new(3000).with_host("127.0.0.1");

    Server::new(server_config, app_builder)
}

fn sanitize_sqlite_url(database_url: String) -> String {
    let is_sqlite = database_url.starts_with("sqlite://") || database_url.starts_with("sqlite:");
    if !is_sqlite {
        return database_url;
    }

    let mut parts = database_url.splitn(2, '?');
    let base = parts.next().unwrap_or_default();
    let Some(query) = parts.next() else {
        return database_url;
    };

    let filtered: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !key.eq_ignore_ascii_case("foreign_keys")
        })
        .collect();

    if filtered.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", filtered.join("&"))
    }
}

fn init_media_root() -> Result<Arc<PathBuf>, io::Error> {
    let configured = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
    let path = PathBuf::from(configured);

    if path.exists() {
        if !path.is_dir() {
            return Err(io::Error::other(format!(
                "MEDIA_ROOT is not a directory: {}",
                path.display()
            )));
        }
    } else {
        std::fs::create_dir_all(&path).map_err(|error| {
            io::Error::other(format!(
                "failed to create MEDIA_ROOT {}: {error}",
                path.display()
            ))
        })?;
    }

    match path.canonicalize() {
        Ok(resolved) => Ok(Arc::new(resolved)),
        Err(_) => Ok(Arc::new(path)),
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let media_root = init_media_root()?;

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://boardshare.db?mode=rwc".to_string());
    let database_url = sanitize_sqlite_url(database_url);

    let migration_db = migration::sea_orm::Database::connect(&database_url).await?;
    Migrator::up(&migration_db, None).await?;

    let db = Database::connect(&database_url).await?;

    build_server(Arc::new(db), media_root).start().await
}

#[cfg(test)]
mod tests {
    use super::sanitize_sqlite_url;

    #[test]
    fn strips_foreign_keys_param_from_sqlite_urls() {
        assert_eq!(
            sanitize_sqlite_url("sqlite://boardshare.db?mode=rwc&foreign_keys=on".to_string()),
            "sqlite://boardshare.db?mode=rwc"
        );
        assert_eq!(
            sanitize_sqlite_url("sqlite://boardshare.db?foreign_keys=on".to_string()),
            "sqlite://boardshare.db"
        );
    }

    #[test]
    fn leaves_non_sqlite_urls_untouched() {
        let url = "postgres://localhost/boardshare?foreign_keys=on".to_string();
        assert_eq!(sanitize_sqlite_url(url.clone()), url);
    }
}
