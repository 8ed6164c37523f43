//! Server bootstrap and runtime configuration.
//!
//! The startup flow is intentionally single-path:
//! `AppBuilder -> Server::new(...) -> Server::start()`.

use crate::core::{
    app::AppBuilder,
    cors::CorsConfig,
    logging::{LoggingConfig, init_logging, request_logging_middleware},
};
use axum::{Router, middleware};
use std::net::SocketAddr;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(port: u16) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port).parse().map_err(|_| {
            ConfigError::InvalidSocketAddress {
                host: self.host.clone(),
                port: self.port,
            }
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Port 0 would ask the OS for a random port; require an explicit one.
        if self.port == 0 {
            return Err(ConfigError::InvalidPort { port: self.port });
        }
        if self.host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        self.address()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(3000)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub enable_cors: bool,
    pub enable_tracing: bool,
    pub enable_logging: bool,
    pub cors_config: Option<CorsConfig>,
    pub logging_config: LoggingConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cors(mut self, enable: bool) -> Self {
        self.enable_cors = enable;
        self
    }

    pub fn with_cors_config(mut self, config: CorsConfig) -> Self {
        self.cors_config = Some(config);
        self.enable_cors = true;
        self
    }

    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }

    pub fn with_logging(mut self, enable: bool) -> Self {
        self.enable_logging = enable;
        self
    }

    pub fn with_logging_config(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self
    }

    pub fn get_cors_config(&self) -> Option<CorsConfig> {
        if self.enable_cors {
            Some(self.cors_config.clone().unwrap_or_else(|| {
                if cfg!(debug_assertions) {
                    CorsConfig::new().dev_mode(true)
                } else {
                    CorsConfig::new()
                }
            }))
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cors_config) = &self.cors_config {
            cors_config.validate()?;
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            enable_tracing: true,
            enable_logging: true,
            cors_config: None,
            logging_config: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port {port}: must be a fixed non-zero port")]
    InvalidPort { port: u16 },
    #[error("Empty host address")]
    EmptyHost,
    #[error("Invalid CORS configuration: {0}")]
    InvalidCors(String),
    #[error("Invalid socket address: {host}:{port}")]
    InvalidSocketAddress { host: String, port: u16 },
}

pub struct Server {
    server_config: ServerConfig,
    app_builder: AppBuilder,
}

impl Server {
    pub fn new(server_config: ServerConfig, app_builder: AppBuilder) -> Self {
        Self {
            server_config,
            app_builder,
        }
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let (app, app_config) = self.app_builder.into_parts();

        if app_config.enable_logging {
            init_logging(&app_config.logging_config)?;
        }

        self.server_config
            .validate()
            .map_err(|err| format!("Invalid server configuration: {err}"))?;
        app_config
            .validate()
            .map_err(|err| format!("Invalid app configuration: {err}"))?;

        let app = apply_app_layers(app, &app_config);

        let addr = self
            .server_config
            .address()
            .map_err(|err| format!("Invalid server configuration: {err}"))?;

        info!(
            host = %self.server_config.host,
            port = %self.server_config.port,
            cors_enabled = app_config.enable_cors,
            "Server starting on http://{}",
            addr
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        Ok(())
    }
}

fn apply_app_layers(mut router: Router, config: &AppConfig) -> Router {
    // Keep middleware assembly centralized so route composition and runtime
    // concerns stay separated.
    if config.enable_logging {
        router = router.layer(middleware::from_fn(request_logging_middleware));
    }

    if config.enable_tracing {
        router = router.layer(tower_http::trace::TraceLayer::new_for_http());
    }

    if let Some(cors_config) = config.get_cors_config() {
        router = router.layer(cors_config.build_layer());
    }

    router
}

async fn shutdown_signal() {
    // `Ctrl+C` is supported on every platform.
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!(signal, "Shutdown signal received, starting graceful shutdown");
}
