//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - list: Homogeneous sequence with element type
//! - map: String-keyed mapping with value type
//! - model: Nested record of another registered schema
//! - optional: Wraps another type and additionally accepts null
//!
//! Constraints and custom validators are attached to field definitions as
//! explicit descriptors and interpreted by [`super::SchemaValidator`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::record::Record;
use super::value::FieldValue;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Homogeneous sequence
    List {
        #[serde(rename = "element_type")]
        element: Box<FieldType>,
    },
    /// String-keyed mapping
    Map {
        #[serde(rename = "value_type")]
        value: Box<FieldType>,
    },
    /// Nested record, referenced by schema name
    Model { schema: String },
    /// Nullable wrapper
    Optional {
        #[serde(rename = "inner_type")]
        inner: Box<FieldType>,
    },
}

impl FieldType {
    pub fn list(element: FieldType) -> Self {
        FieldType::List {
            element: Box::new(element),
        }
    }

    pub fn map(value: FieldType) -> Self {
        FieldType::Map {
            value: Box::new(value),
        }
    }

    pub fn model(schema: impl Into<String>) -> Self {
        FieldType::Model {
            schema: schema.into(),
        }
    }

    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional {
            inner: Box::new(inner),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::List { .. } => "list",
            FieldType::Map { .. } => "map",
            FieldType::Model { .. } => "model",
            FieldType::Optional { .. } => "optional",
        }
    }

    /// Schema names referenced by this type, including through wrappers.
    pub fn referenced_schemas(&self) -> Vec<&str> {
        match self {
            FieldType::Model { schema } => vec![schema.as_str()],
            FieldType::List { element } => element.referenced_schemas(),
            FieldType::Map { value } => value.referenced_schemas(),
            FieldType::Optional { inner } => inner.referenced_schemas(),
            _ => Vec::new(),
        }
    }
}

/// Built-in constraint kinds with their bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "bound", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Length must be at least n
    MinLength(usize),
    /// Length must be at most n
    MaxLength(usize),
    /// Value must be >= bound
    Ge(f64),
    /// Value must be > bound
    Gt(f64),
    /// Value must be <= bound
    Le(f64),
    /// Value must be < bound
    Lt(f64),
}

impl ConstraintKind {
    /// Returns the constraint name as used in error reports
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::MinLength(_) => "min_length",
            ConstraintKind::MaxLength(_) => "max_length",
            ConstraintKind::Ge(_) => "ge",
            ConstraintKind::Gt(_) => "gt",
            ConstraintKind::Le(_) => "le",
            ConstraintKind::Lt(_) => "lt",
        }
    }

    /// Evaluates the constraint. `None` means the constraint does not apply
    /// to this kind of value.
    pub fn check(&self, value: &FieldValue) -> Option<bool> {
        match *self {
            ConstraintKind::MinLength(n) => value.length().map(|len| len >= n),
            ConstraintKind::MaxLength(n) => value.length().map(|len| len <= n),
            ConstraintKind::Ge(b) => value.as_f64().map(|v| v >= b),
            ConstraintKind::Gt(b) => value.as_f64().map(|v| v > b),
            ConstraintKind::Le(b) => value.as_f64().map(|v| v <= b),
            ConstraintKind::Lt(b) => value.as_f64().map(|v| v < b),
        }
    }

    /// Default failure message for a value of the given kind
    pub fn default_message(&self, value: &FieldValue) -> String {
        let subject = match value {
            FieldValue::Str(_) => "String",
            FieldValue::List(_) => "List",
            FieldValue::Map(_) => "Map",
            _ => "Input",
        };
        let unit = match value {
            FieldValue::Str(_) => "characters",
            _ => "items",
        };
        match *self {
            ConstraintKind::MinLength(n) => {
                format!("{} should have at least {} {}", subject, n, unit)
            }
            ConstraintKind::MaxLength(n) => {
                format!("{} should have at most {} {}", subject, n, unit)
            }
            ConstraintKind::Ge(b) => format!("Input should be greater than or equal to {}", b),
            ConstraintKind::Gt(b) => format!("Input should be greater than {}", b),
            ConstraintKind::Le(b) => format!("Input should be less than or equal to {}", b),
            ConstraintKind::Lt(b) => format!("Input should be less than {}", b),
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::MinLength(n) | ConstraintKind::MaxLength(n) => {
                write!(f, "{}={}", self.name(), n)
            }
            ConstraintKind::Ge(b)
            | ConstraintKind::Gt(b)
            | ConstraintKind::Le(b)
            | ConstraintKind::Lt(b) => write!(f, "{}={}", self.name(), b),
        }
    }
}

/// Constraint descriptor: kind, bound and optional message override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(flatten)]
    pub kind: ConstraintKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn min_length(n: usize) -> Self {
        Self::new(ConstraintKind::MinLength(n))
    }

    pub fn max_length(n: usize) -> Self {
        Self::new(ConstraintKind::MaxLength(n))
    }

    pub fn ge(bound: f64) -> Self {
        Self::new(ConstraintKind::Ge(bound))
    }

    pub fn gt(bound: f64) -> Self {
        Self::new(ConstraintKind::Gt(bound))
    }

    pub fn le(bound: f64) -> Self {
        Self::new(ConstraintKind::Le(bound))
    }

    pub fn lt(bound: f64) -> Self {
        Self::new(ConstraintKind::Lt(bound))
    }

    /// Replaces the default failure message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Failure message for the given offending value
    pub fn message_for(&self, value: &FieldValue) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.default_message(value))
    }
}

type ValidatorFn = dyn Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync;
type ComputeFn = dyn Fn(&Record) -> FieldValue + Send + Sync;

/// Custom field validator.
///
/// Receives the coerced value and returns it (possibly transformed) or a
/// human-readable reason for rejection.
#[derive(Clone)]
pub struct FieldValidator {
    name: String,
    check: Arc<ValidatorFn>,
}

impl FieldValidator {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, value: FieldValue) -> Result<FieldValue, String> {
        (self.check)(value)
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Read-only derived field, recomputed from stored fields on every access
#[derive(Clone)]
pub struct ComputedField {
    name: String,
    field_type: FieldType,
    compute: Arc<ComputeFn>,
}

impl ComputedField {
    pub fn new<F>(name: impl Into<String>, field_type: FieldType, compute: F) -> Self
    where
        F: Fn(&Record) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            field_type,
            compute: Arc::new(compute),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn evaluate(&self, record: &Record) -> FieldValue {
        (self.compute)(record)
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// Field definition: canonical name, optional alias, type, default and rules
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub alias: Option<String>,
    pub field_type: FieldType,
    /// `None` means the field is required
    pub default: Option<FieldValue>,
    pub constraints: Vec<Constraint>,
    pub validators: Vec<FieldValidator>,
}

impl FieldDef {
    /// Create a required field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            default: None,
            constraints: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    /// Create an optional field that defaults to null
    pub fn optional(name: impl Into<String>, inner: FieldType) -> Self {
        Self::new(name, FieldType::optional(inner)).default(FieldValue::Null)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn validator(mut self, validator: FieldValidator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Key used when serializing
    pub fn output_key(&self, by_alias: bool) -> &str {
        match (&self.alias, by_alias) {
            (Some(alias), true) => alias,
            _ => &self.name,
        }
    }

    /// Descriptor for introspection
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "alias": self.alias,
            "type": self.field_type,
            "required": self.is_required(),
            "default": self.default.as_ref().map(|d| d.to_json(false)),
            "constraints": self.constraints,
            "validators": self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
        })
    }
}

/// Policy for input keys that match no declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Silently drop unknown keys
    #[default]
    Ignore,
    /// Reject unknown keys
    Forbid,
}

/// Per-schema construction behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Accept canonical names for aliased fields
    pub populate_by_name: bool,
    pub extra: ExtraPolicy,
}

/// Complete schema definition
#[derive(Debug, Clone)]
pub struct Schema {
    pub name: String,
    /// Schema whose fields are inherited, resolved at registration
    pub parent: Option<String>,
    pub fields: Vec<FieldDef>,
    pub computed: Vec<ComputedField>,
    pub config: SchemaConfig,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            computed: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn computed(mut self, computed: ComputedField) -> Self {
        self.computed.push(computed);
        self
    }

    pub fn populate_by_name(mut self, enabled: bool) -> Self {
        self.config.populate_by_name = enabled;
        self
    }

    pub fn extra(mut self, policy: ExtraPolicy) -> Self {
        self.config.extra = policy;
        self
    }

    /// Index of a stored field by canonical name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_computed(&self, name: &str) -> Option<&ComputedField> {
        self.computed.iter().find(|c| c.name() == name)
    }

    /// Whether an input key addresses a stored field under this schema's
    /// resolution rules
    pub fn accepts_key(&self, key: &str) -> bool {
        self.fields.iter().any(|f| match &f.alias {
            Some(alias) => alias == key || (self.config.populate_by_name && f.name == key),
            None => f.name == key,
        })
    }

    /// Checks that names are unique and computed fields do not shadow
    /// stored fields.
    pub fn validate_structure(&self) -> Result<(), String> {
        let mut seen: Vec<&str> = Vec::new();
        for field in &self.fields {
            for key in std::iter::once(field.name.as_str()).chain(field.alias.as_deref()) {
                if seen.contains(&key) {
                    return Err(format!("duplicate field name or alias '{}'", key));
                }
                seen.push(key);
            }
        }
        for computed in &self.computed {
            if seen.contains(&computed.name()) {
                return Err(format!(
                    "computed field '{}' collides with a stored field",
                    computed.name()
                ));
            }
            seen.push(computed.name());
        }
        Ok(())
    }

    /// JSON description of the schema's descriptors
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "parent": self.parent,
            "config": self.config,
            "fields": self.fields.iter().map(FieldDef::describe).collect::<Vec<_>>(),
            "computed": self
                .computed
                .iter()
                .map(|c| json!({ "name": c.name(), "type": c.field_type() }))
                .collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_checks() {
        assert_eq!(ConstraintKind::MinLength(2).check(&"L".into()), Some(false));
        assert_eq!(ConstraintKind::MaxLength(3).check(&"abc".into()), Some(true));
        assert_eq!(ConstraintKind::Ge(0.0).check(&FieldValue::Int(0)), Some(true));
        assert_eq!(ConstraintKind::Gt(0.0).check(&FieldValue::Int(0)), Some(false));
        assert_eq!(ConstraintKind::Lt(1.0).check(&FieldValue::Float(0.5)), Some(true));
        assert_eq!(ConstraintKind::Ge(0.0).check(&"x".into()), None);
    }

    #[test]
    fn test_constraint_messages() {
        let c = Constraint::min_length(3);
        assert_eq!(
            c.message_for(&"ab".into()),
            "String should have at least 3 characters"
        );
        let c = Constraint::gt(0.0).with_message("quantity must be positive");
        assert_eq!(c.message_for(&FieldValue::Int(0)), "quantity must be positive");
    }

    #[test]
    fn test_constraint_serializes_kind_and_bound() {
        let value = serde_json::to_value(Constraint::ge(0.0)).unwrap();
        assert_eq!(value["kind"], "ge");
        assert_eq!(value["bound"], 0.0);
    }

    #[test]
    fn test_output_key() {
        let field = FieldDef::string("full_name").alias("fullName");
        assert_eq!(field.output_key(true), "fullName");
        assert_eq!(field.output_key(false), "full_name");
        assert_eq!(FieldDef::string("country").output_key(true), "country");
    }

    #[test]
    fn test_accepts_key_respects_populate_by_name() {
        let strict = Schema::new("P").field(FieldDef::string("full_name").alias("fullName"));
        assert!(strict.accepts_key("fullName"));
        assert!(!strict.accepts_key("full_name"));

        let lenient = strict.clone().populate_by_name(true);
        assert!(lenient.accepts_key("full_name"));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let schema = Schema::new("Bad")
            .field(FieldDef::string("a").alias("b"))
            .field(FieldDef::string("b"));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_computed_collision_rejected() {
        let schema = Schema::new("Bad")
            .field(FieldDef::string("total"))
            .computed(ComputedField::new("total", FieldType::String, |_| {
                FieldValue::Null
            }));
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("total"));
    }

    #[test]
    fn test_referenced_schemas_through_wrappers() {
        let t = FieldType::list(FieldType::optional(FieldType::model("Item")));
        assert_eq!(t.referenced_schemas(), vec!["Item"]);
        assert!(FieldType::String.referenced_schemas().is_empty());
    }
}
