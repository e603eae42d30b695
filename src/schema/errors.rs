//! Schema error types
//!
//! Error codes:
//! - SCHEMA_UNKNOWN
//! - SCHEMA_DUPLICATE
//! - SCHEMA_UNKNOWN_PARENT
//! - SCHEMA_UNKNOWN_REFERENCE
//! - SCHEMA_INVALID_DEFINITION
//! - SCHEMA_VALIDATION_FAILED
//!
//! Construction failures are collected into a single [`ValidationError`]
//! carrying one [`FieldError`] per failing field path.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::types::ConstraintKind;

/// Why a single field failed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "constraint", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required field absent and no default declared
    MissingField,
    /// Value not convertible to the declared type
    Type,
    /// Typed value violates a built-in bound
    Constraint(ConstraintKind),
    /// A custom validator rejected the value
    Validator,
    /// Input supplied a computed field with a value that disagrees with it
    ComputedInput,
    /// A computed field evaluated to a non-finite number
    ComputedValue,
    /// Undeclared key under a forbid-extra schema
    ExtraField,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "missing",
            ErrorKind::Type => "type_error",
            ErrorKind::Constraint(_) => "constraint",
            ErrorKind::Validator => "value_error",
            ErrorKind::ComputedInput => "computed_input",
            ErrorKind::ComputedValue => "computed_value",
            ErrorKind::ExtraField => "extra_forbidden",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Constraint(kind) => write!(f, "{} ({})", self.code(), kind),
            _ => write!(f, "{}", self.code()),
        }
    }
}

/// One failure at a field path such as `items.0.product.price`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::MissingField, "Field required")
    }

    pub fn type_mismatch(path: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(
            path,
            ErrorKind::Type,
            format!("Input should be a valid {}, got {}", expected, actual),
        )
    }

    pub fn extra(path: impl Into<String>) -> Self {
        Self::new(path, ErrorKind::ExtraField, "Extra inputs are not permitted")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path, self.message, self.kind)
    }
}

/// Aggregate construction failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub schema: String,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(schema: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            schema: schema.into(),
            errors,
        }
    }

    /// `(path, message)` pairs in report order
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .map(|e| (e.path.as_str(), e.message.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} validation error(s) for {}",
            self.errors.len(),
            self.schema
        )?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Schema registry and construction errors
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Schema '{0}' not found")]
    UnknownSchema(String),

    #[error("Schema '{0}' is already registered and immutable")]
    DuplicateSchema(String),

    #[error("Schema '{schema}' extends unknown schema '{parent}'")]
    UnknownParent { schema: String, parent: String },

    #[error("Schema '{schema}' references unknown schema '{reference}'")]
    UnknownReference { schema: String, reference: String },

    #[error("Schema '{schema}' is malformed: {reason}")]
    InvalidDefinition { schema: String, reason: String },

    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownSchema(_) => "SCHEMA_UNKNOWN",
            SchemaError::DuplicateSchema(_) => "SCHEMA_DUPLICATE",
            SchemaError::UnknownParent { .. } => "SCHEMA_UNKNOWN_PARENT",
            SchemaError::UnknownReference { .. } => "SCHEMA_UNKNOWN_REFERENCE",
            SchemaError::InvalidDefinition { .. } => "SCHEMA_INVALID_DEFINITION",
            SchemaError::Validation(_) => "SCHEMA_VALIDATION_FAILED",
        }
    }

    /// Returns validation details if this is a construction failure
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Creates a field path from prefix and segment.
pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else if segment.is_empty() {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
