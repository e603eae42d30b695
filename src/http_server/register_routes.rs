//! Registration HTTP Routes
//!
//! `POST /register`: validates a User payload, appends its mapping to the
//! user store and echoes the stored user back.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{catalog, SchemaError, SchemaRegistry, SchemaResult};
use crate::store::UserStore;

use super::errors::{ApiError, ApiResult};

pub const REGISTERED_MESSAGE: &str = "User registered successfully!";

// ==================
// Shared State
// ==================

/// Registration state shared across handlers
pub struct RegisterState {
    registry: SchemaRegistry,
    /// Serializes read-modify-write cycles on the users file
    store: Mutex<UserStore>,
}

impl RegisterState {
    pub fn new(store: UserStore) -> SchemaResult<Self> {
        Ok(Self {
            registry: catalog::registration()?,
            store: Mutex::new(store),
        })
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: Value,
}

// ==================
// Register Routes
// ==================

/// Create registration routes
pub fn register_routes(state: Arc<RegisterState>) -> Router {
    Router::new()
        .route("/register", post(register_handler))
        .with_state(state)
}

async fn register_handler(
    State(state): State<Arc<RegisterState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RegisterResponse>> {
    let Json(payload) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let user = match state.registry.construct(catalog::USER, &payload) {
        Ok(user) => user,
        Err(SchemaError::Validation(v)) => {
            let count = v.len().to_string();
            log_event_with_fields(
                Event::RecordRejected,
                &[("schema", catalog::USER), ("errors", count.as_str())],
            );
            return Err(ApiError::Validation(v));
        }
        Err(other) => return Err(other.into()),
    };

    let data = user.to_mapping(false);
    let total = {
        let store = state.store.lock().await;
        store.append(data.clone()).map_err(|e| {
            let reason = e.to_string();
            log_event_with_fields(Event::StoreWriteFailed, &[("error", reason.as_str())]);
            e
        })?
    };

    tracing::debug!(name = user.str("name").unwrap_or_default(), "registered user");
    let total = total.to_string();
    log_event_with_fields(Event::UserRegistered, &[("total", total.as_str())]);

    Ok(Json(RegisterResponse {
        message: REGISTERED_MESSAGE.to_string(),
        data,
    }))
}
