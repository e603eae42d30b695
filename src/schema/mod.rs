//! Schema Validator subsystem for recordkit
//!
//! Schemas are named, ordered sets of field descriptors. Records are
//! constructed from JSON input in a single step and are immutable.
//!
//! # Design Principles
//!
//! - Construction is atomic: every failure is reported, no partial records
//! - Narrowest safe coercion, no silent lossy conversion
//! - Constraints are explicit descriptors, not annotations
//! - Computed fields are pure and never stored
//! - Inheritance is field-set composition resolved at registration

pub mod catalog;
mod errors;
mod record;
mod registry;
mod types;
mod validator;
mod value;

pub use errors::{ErrorKind, FieldError, SchemaError, SchemaResult, ValidationError};
pub use record::Record;
pub use registry::SchemaRegistry;
pub use types::{
    ComputedField, Constraint, ConstraintKind, ExtraPolicy, FieldDef, FieldType,
    FieldValidator, Schema, SchemaConfig,
};
pub use validator::SchemaValidator;
pub use value::FieldValue;
