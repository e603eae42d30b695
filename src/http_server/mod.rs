//! # recordkit HTTP Server Module
//!
//! Combines all endpoint routers into a single Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/register` - Register a user
//! - `/schemas/*` - Showcase schema introspection and validation

pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod register_routes;
pub mod schema_routes;
pub mod server;

pub use config::{ConfigError, ServiceConfig};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
