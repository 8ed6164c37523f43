//! `common-http-server` provides a reusable Axum-based HTTP server scaffold.
//!
//! The startup flow is intentionally single-path:
//! `AppBuilder -> Server::new(...) -> Server::start()`. Route composition
//! lives in `AppBuilder`; runtime concerns (logging, tracing, CORS) are
//! applied as layers by `Server::start`.

pub mod core;

pub use core::{
    ApiResponse, AppBuilder, AppConfig, ConfigError, CorsConfig, HealthResponse, LogFormat,
    LoggingConfig, REQUEST_ID_HEADER, RequestId, Server, ServerConfig, health_check, init_logging,
    request_logging_middleware,
};
