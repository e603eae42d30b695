//! Schema HTTP Routes
//!
//! Introspection and ad-hoc validation against the showcase catalog.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{catalog, SchemaRegistry, SchemaResult};

use super::errors::{ApiError, ApiResult};

/// Schema state shared across handlers
pub struct SchemaState {
    registry: SchemaRegistry,
}

impl SchemaState {
    pub fn new() -> SchemaResult<Self> {
        Ok(Self {
            registry: catalog::showcase()?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    #[serde(default)]
    pub by_alias: bool,
}

#[derive(Debug, Serialize)]
pub struct SchemaListResponse {
    pub schemas: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub schema: String,
    pub data: Value,
}

/// Create schema routes
pub fn schema_routes(state: Arc<SchemaState>) -> Router {
    Router::new()
        .route("/", get(list_schemas))
        .route("/:name", get(describe_schema))
        .route("/:name/validate", post(validate_record))
        .with_state(state)
}

async fn list_schemas(State(state): State<Arc<SchemaState>>) -> Json<SchemaListResponse> {
    let schemas: Vec<String> = state.registry.names().into_iter().map(String::from).collect();
    Json(SchemaListResponse {
        total: schemas.len(),
        schemas,
    })
}

async fn describe_schema(
    State(state): State<Arc<SchemaState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.registry.describe(&name)?))
}

async fn validate_record(
    State(state): State<Arc<SchemaState>>,
    Path(name): Path<String>,
    Query(query): Query<ValidateQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ValidateResponse>> {
    let Json(payload) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let record = state.registry.construct(&name, &payload)?;
    log_event_with_fields(Event::RecordConstructed, &[("schema", name.as_str())]);

    Ok(Json(ValidateResponse {
        data: record.to_mapping(query.by_alias),
        schema: name,
    }))
}
