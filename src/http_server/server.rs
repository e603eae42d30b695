//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::observability::{log_event, log_event_with_fields, Event};
use crate::schema::SchemaResult;
use crate::store::UserStore;

use super::config::ServiceConfig;
use super::observability_routes::health_routes;
use super::register_routes::{register_routes, RegisterState};
use super::schema_routes::{schema_routes, SchemaState};

/// HTTP server for the registration service
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration
    pub fn new(config: ServiceConfig) -> SchemaResult<Self> {
        let router = Self::build_router(&config)?;
        Ok(Self { config, router })
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServiceConfig) -> SchemaResult<Router> {
        let register_state = Arc::new(RegisterState::new(UserStore::new(&config.users_file))?);
        let schema_state = Arc::new(SchemaState::new()?);
        log_event(Event::SchemasLoaded);

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Ok(Router::new()
            .merge(health_routes())
            .merge(register_routes(register_state))
            .nest("/schemas", schema_routes(schema_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        let users_file = self.config.users_file.display().to_string();
        log_event_with_fields(
            Event::Serving,
            &[("addr", addr.as_str()), ("users_file", users_file.as_str())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> ServiceConfig {
        ServiceConfig {
            users_file: dir.path().join("users.json"),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn test_server_creation() {
        let dir = TempDir::new().unwrap();
        let server = HttpServer::new(config_in(&dir)).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig {
            port: 8080,
            ..config_in(&dir)
        };
        let server = HttpServer::new(config).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig {
            cors_origins: vec!["http://localhost:5173".into()],
            ..config_in(&dir)
        };
        let _router = HttpServer::new(config).unwrap().router();
    }
}
