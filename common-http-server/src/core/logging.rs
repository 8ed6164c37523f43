//! Logging initialization and request logging middleware.

use axum::{
    extract::Request as AxumRequest,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            // Default to human-friendly terminal output.
            format: LogFormat::Pretty,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, include_target: bool) -> Self {
        self.include_target = include_target;
        self
    }
}

/// Request id made available to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

fn is_valid_request_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b':'))
}

fn normalized_request_id(candidate: Option<&str>) -> String {
    if let Some(raw) = candidate {
        let trimmed = raw.trim();
        if is_valid_request_id(trimmed) {
            return trimmed.to_string();
        }
    }

    uuid::Uuid::new_v4().to_string()
}

/// Initialize the tracing subscriber. The filter comes from `RUST_LOG` and
/// falls back to `info`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target);

    let init_result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(err) = init_result {
        // Parent binaries and tests may have installed a subscriber already.
        if err.to_string().contains("already been set") {
            return Ok(());
        }
        return Err(err);
    }

    info!("Logging system initialized");
    Ok(())
}

/// Per-request logging: assigns or normalizes the request id, records
/// latency, and echoes the id back on the response.
pub async fn request_logging_middleware(request: AxumRequest, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let request_id_header = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok());
    let request_id = normalized_request_id(request_id_header);

    let mut request = request;
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    let duration = start_time.elapsed();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    match status.as_u16() {
        200..=299 => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms = duration.as_millis(),
                "Request completed"
            );
        }
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms = duration.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms = duration.as_millis(),
                "Server error"
            );
        }
        _ => {
            debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                duration_ms = duration.as_millis(),
                "Request completed"
            );
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn generated_request_id_is_added_to_response_header() {
        let app = Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn(request_logging_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|header| header.to_str().ok())
            .unwrap_or("");
        assert!(!request_id.is_empty());
    }

    #[tokio::test]
    async fn provided_request_id_is_preserved_in_response_header() {
        let app = Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn(request_logging_middleware));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "demo-request-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|header| header.to_str().ok()),
            Some("demo-request-id")
        );
    }

    #[tokio::test]
    async fn invalid_request_id_is_replaced() {
        let app = Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn(request_logging_middleware));

        let invalid = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, invalid.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|header| header.to_str().ok())
            .unwrap_or("");

        assert_ne!(request_id, invalid);
        assert!(!request_id.is_empty());
        assert!(request_id.len() <= MAX_REQUEST_ID_LEN);
    }
}
