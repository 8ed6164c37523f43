use crate::core::response::HealthResponse;
use axum::response::IntoResponse;

/// Liveness endpoint registered by `AppBuilder`.
pub async fn health_check() -> impl IntoResponse {
    HealthResponse::healthy()
}
