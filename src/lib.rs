//! recordkit - Declarative record schemas with aggregated validation errors
//!
//! Schemas are runtime descriptors registered in a [`schema::SchemaRegistry`].
//! Construction coerces a JSON object into a [`schema::Record`] or reports
//! every field failure at once. A small HTTP service registers users into a
//! JSON file.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod store;
