//! CORS configuration helpers.

use crate::core::server::ConfigError;
use axum::http::{HeaderName, HeaderValue, Method};
use std::str::FromStr;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds.
    pub max_age: Option<u64>,
    pub dev_mode_allow_all: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-Request-ID".to_string(),
            ],
            allow_credentials: false,
            max_age: Some(86400),
            dev_mode_allow_all: false,
        }
    }
}

impl CorsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_origins(mut self, origins: Vec<&str>) -> Self {
        self.allowed_origins = origins.into_iter().map(|origin| origin.to_string()).collect();
        self
    }

    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode_allow_all = dev_mode;
        self
    }

    fn build_restricted_layer(&self) -> CorsLayer {
        let mut cors = CorsLayer::new();

        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        if !origins.is_empty() {
            cors = cors.allow_origin(origins);
        }

        let methods: Vec<Method> = self
            .allowed_methods
            .iter()
            .filter_map(|method| method.parse().ok())
            .collect();
        if !methods.is_empty() {
            cors = cors.allow_methods(methods);
        }

        let headers: Vec<HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|header| HeaderName::from_str(header).ok())
            .collect();
        if !headers.is_empty() {
            cors = cors.allow_headers(headers);
        }

        if self.allow_credentials {
            cors = cors.allow_credentials(true);
        }

        if let Some(max_age) = self.max_age {
            cors = cors.max_age(std::time::Duration::from_secs(max_age));
        }

        cors
    }

    pub fn build_layer(&self) -> CorsLayer {
        if self.dev_mode_allow_all {
            tracing::warn!("CORS is running in development mode - allowing all origins");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            self.build_restricted_layer()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() && !self.dev_mode_allow_all {
            return Err(ConfigError::InvalidCors(
                "allowed origins must not be empty".to_string(),
            ));
        }
        if self.allowed_methods.is_empty() {
            return Err(ConfigError::InvalidCors(
                "allowed methods must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
