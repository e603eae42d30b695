//! Record construction: resolution, coercion, constraints, custom validators
//!
//! Construction semantics:
//! - Input must be a JSON object
//! - Aliased fields resolve by alias, and by canonical name when the schema
//!   populates by name
//! - Absent fields take their declared default or fail as missing
//! - Values are coerced with the narrowest safe conversion
//! - Built-in constraints run before custom validators
//! - Every failing field is reported; construction is all-or-nothing
//!
//! The validator never mutates input and holds no state of its own, so it
//! can be shared freely across threads.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::errors::{join_path, ErrorKind, FieldError, SchemaError, SchemaResult, ValidationError};
use super::record::Record;
use super::registry::SchemaRegistry;
use super::types::{ExtraPolicy, FieldDef, FieldType, Schema};
use super::value::FieldValue;

/// Path reported when the whole input has the wrong shape
const ROOT_PATH: &str = "$root";

type FieldResult<T> = Result<T, Vec<FieldError>>;

/// Builds records from raw JSON input against registered schemas.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Constructs a record of the named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownSchema` if the schema is not registered,
    /// or `SchemaError::Validation` carrying every field failure.
    pub fn construct(&self, schema_name: &str, input: &Value) -> SchemaResult<Record> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| SchemaError::UnknownSchema(schema_name.to_string()))?;

        self.build(&schema, input, "").map_err(|errors| {
            tracing::debug!(
                schema = schema_name,
                error_count = errors.len(),
                "record construction rejected"
            );
            SchemaError::Validation(ValidationError::new(schema_name, errors))
        })
    }

    /// Validates an object against a schema, producing a record.
    ///
    /// Computed fields are derived from a complete record, so they are only
    /// evaluated once every stored field has passed. When a stored field
    /// fails, supplied computed values go unchecked and are reported on the
    /// next attempt.
    fn build(&self, schema: &Arc<Schema>, input: &Value, path: &str) -> FieldResult<Record> {
        let obj = input.as_object().ok_or_else(|| {
            let at = if path.is_empty() { ROOT_PATH } else { path };
            vec![FieldError::type_mismatch(at, &schema.name, json_type_name(input))]
        })?;

        let mut errors = Vec::new();
        let mut values = Vec::with_capacity(schema.fields.len());

        for field in &schema.fields {
            let field_path = join_path(path, &field.name);

            match resolve(schema, field, obj) {
                Some(raw) => match self.validate_field(field, raw, &field_path) {
                    Ok(value) => values.push(value),
                    Err(mut field_errors) => {
                        errors.append(&mut field_errors);
                        values.push(FieldValue::Null);
                    }
                },
                None => match &field.default {
                    Some(default) => values.push(default.clone()),
                    None => {
                        errors.push(FieldError::missing(field_path));
                        values.push(FieldValue::Null);
                    }
                },
            }
        }

        if schema.config.extra == ExtraPolicy::Forbid {
            for key in obj.keys() {
                if !schema.accepts_key(key) && schema.get_computed(key).is_none() {
                    errors.push(FieldError::extra(join_path(path, key)));
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let record = Record::new(Arc::clone(schema), values);

        for computed in &schema.computed {
            let derived = computed.evaluate(&record);
            if let FieldValue::Float(f) = &derived {
                if !f.is_finite() {
                    errors.push(FieldError::new(
                        join_path(path, computed.name()),
                        ErrorKind::ComputedValue,
                        format!("Computed field '{}' is not a finite number", computed.name()),
                    ));
                    continue;
                }
            }
            // Supplied computed values must agree with the derived value.
            if let Some(raw) = obj.get(computed.name()) {
                if !derived.matches_json(raw) {
                    errors.push(FieldError::new(
                        join_path(path, computed.name()),
                        ErrorKind::ComputedInput,
                        format!(
                            "Computed field '{}' is read-only and evaluates to {}",
                            computed.name(),
                            derived.to_json(false)
                        ),
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    /// Coerces, constrains and runs custom validators for one field.
    fn validate_field(&self, field: &FieldDef, raw: &Value, path: &str) -> FieldResult<FieldValue> {
        let mut value = self.coerce(&field.field_type, raw, path)?;

        for constraint in &field.constraints {
            if constraint.kind.check(&value) == Some(false) {
                return Err(vec![FieldError::new(
                    path,
                    ErrorKind::Constraint(constraint.kind),
                    constraint.message_for(&value),
                )]);
            }
        }

        for validator in &field.validators {
            value = validator
                .apply(value)
                .map_err(|reason| vec![FieldError::new(path, ErrorKind::Validator, reason)])?;
        }

        Ok(value)
    }

    /// Converts a raw value to the declared type.
    fn coerce(&self, field_type: &FieldType, raw: &Value, path: &str) -> FieldResult<FieldValue> {
        let mismatch = || vec![FieldError::type_mismatch(path, field_type.type_name(), json_type_name(raw))];

        match field_type {
            FieldType::Optional { inner } => {
                if raw.is_null() {
                    Ok(FieldValue::Null)
                } else {
                    self.coerce(inner, raw, path)
                }
            }
            FieldType::String => raw
                .as_str()
                .map(|s| FieldValue::Str(s.to_string()))
                .ok_or_else(mismatch),
            FieldType::Int => coerce_int(raw).map(FieldValue::Int).ok_or_else(mismatch),
            FieldType::Float => coerce_float(raw).map(FieldValue::Float).ok_or_else(mismatch),
            FieldType::Bool => coerce_bool(raw).map(FieldValue::Bool).ok_or_else(mismatch),
            FieldType::List { element } => {
                let items = raw.as_array().ok_or_else(mismatch)?;
                let mut errors = Vec::new();
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match self.coerce(element, item, &join_path(path, &i.to_string())) {
                        Ok(v) => values.push(v),
                        Err(mut e) => errors.append(&mut e),
                    }
                }
                if errors.is_empty() {
                    Ok(FieldValue::List(values))
                } else {
                    Err(errors)
                }
            }
            FieldType::Map { value } => {
                let entries = raw.as_object().ok_or_else(mismatch)?;
                self.coerce_map(value, entries, path)
            }
            FieldType::Model { schema } => {
                let nested = self.registry.get(schema).ok_or_else(|| {
                    vec![FieldError::new(
                        path,
                        ErrorKind::Type,
                        format!("Unknown schema '{}'", schema),
                    )]
                })?;
                self.build(&nested, raw, path).map(FieldValue::Record)
            }
        }
    }

    fn coerce_map(
        &self,
        value_type: &FieldType,
        entries: &Map<String, Value>,
        path: &str,
    ) -> FieldResult<FieldValue> {
        let mut errors = Vec::new();
        let mut values = Vec::with_capacity(entries.len());
        for (key, raw) in entries {
            match self.coerce(value_type, raw, &join_path(path, key)) {
                Ok(v) => values.push((key.clone(), v)),
                Err(mut e) => errors.append(&mut e),
            }
        }
        if errors.is_empty() {
            Ok(FieldValue::Map(values))
        } else {
            Err(errors)
        }
    }
}

/// Finds the raw input for a field by alias and/or canonical name.
fn resolve<'v>(schema: &Schema, field: &FieldDef, obj: &'v Map<String, Value>) -> Option<&'v Value> {
    match &field.alias {
        Some(alias) => obj.get(alias).or_else(|| {
            if schema.config.populate_by_name {
                obj.get(&field.name)
            } else {
                None
            }
        }),
        None => obj.get(&field.name),
    }
}

/// Integers, integral floats and integer strings.
///
/// Strings must be plain decimal integers, optionally with an all-zero
/// fraction (`"3.0"`). Exponents and non-zero fractions are rejected.
fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => parse_int_str(s.trim()),
        _ => None,
    }
}

fn parse_int_str(s: &str) -> Option<i64> {
    match s.split_once('.') {
        None => s.parse::<i64>().ok(),
        Some((whole, fraction)) => {
            if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') {
                whole.parse::<i64>().ok()
            } else {
                None
            }
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Any finite number, or a numeric string.
fn coerce_float(raw: &Value) -> Option<f64> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn coerce_bool(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
