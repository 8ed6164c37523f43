//! Application router builder.
//!
//! `AppBuilder` only focuses on route composition. Runtime concerns such as
//! logging/tracing/cors layers are applied later by `Server::start`.

use crate::core::{health::health_check, response::ApiResponse, server::AppConfig};
use axum::{Router, http::StatusCode, routing::get};

pub struct AppBuilder {
    router: Router,
    app_config: AppConfig,
}

impl AppBuilder {
    pub fn new(app_config: AppConfig) -> Self {
        Self {
            router: Router::new().route("/health", get(health_check)),
            app_config,
        }
    }

    pub fn route(mut self, path: &str, method: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, method);
        self
    }

    pub fn nest(mut self, path: &str, router: Router) -> Self {
        self.router = self.router.nest(path, router);
        self
    }

    /// Consume the builder and return the finalized router (with fallback
    /// route) together with the app runtime configuration used by `Server`.
    pub(crate) fn into_parts(self) -> (Router, AppConfig) {
        (self.router.fallback(fallback_handler), self.app_config)
    }
}

async fn fallback_handler() -> (StatusCode, ApiResponse<()>) {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::error("Endpoint not found".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::Request};
    use tower::ServiceExt;

    async fn custom_handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn keeps_custom_routes_when_building() {
        let (app, _) = AppBuilder::new(AppConfig::default())
            .route("/custom", get(custom_handler))
            .into_parts();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/custom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_not_found() {
        let (app, _) = AppBuilder::new(AppConfig::default()).into_parts();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
