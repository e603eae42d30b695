//! Schema registry
//!
//! Holds materialized schemas by name. Inheritance is resolved here: a
//! schema that extends another is stored with the union of both field sets,
//! so construction never needs to walk a parent chain.
//!
//! Registered schemas are immutable; re-registering a name is an error.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::record::Record;
use super::types::{ExtraPolicy, Schema};
use super::validator::SchemaValidator;

/// In-memory registry of named schemas.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema after resolving its parent and checking its
    /// structure and references.
    ///
    /// Parents and nested schemas must be registered first. A schema may
    /// reference itself.
    pub fn register(&mut self, schema: Schema) -> SchemaResult<()> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateSchema(schema.name));
        }

        let schema = self.materialize(schema)?;

        schema
            .validate_structure()
            .map_err(|reason| SchemaError::InvalidDefinition {
                schema: schema.name.clone(),
                reason,
            })?;

        for field in &schema.fields {
            for reference in field.field_type.referenced_schemas() {
                if reference != schema.name && !self.contains(reference) {
                    return Err(SchemaError::UnknownReference {
                        schema: schema.name.clone(),
                        reference: reference.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            schema = %schema.name,
            fields = schema.fields.len(),
            computed = schema.computed.len(),
            "schema registered"
        );
        self.schemas.insert(schema.name.clone(), Arc::new(schema));
        Ok(())
    }

    /// Merges the parent's fields ahead of the schema's own.
    ///
    /// An own field with a parent field's name replaces it in place. Config
    /// flags are inherited and may only be strengthened by the child.
    fn materialize(&self, schema: Schema) -> SchemaResult<Schema> {
        let Some(parent_name) = schema.parent.clone() else {
            return Ok(schema);
        };

        let parent = self
            .get(&parent_name)
            .ok_or_else(|| SchemaError::UnknownParent {
                schema: schema.name.clone(),
                parent: parent_name.clone(),
            })?;

        let mut fields = parent.fields.clone();
        for field in schema.fields {
            match fields.iter().position(|f| f.name == field.name) {
                Some(i) => fields[i] = field,
                None => fields.push(field),
            }
        }

        let mut computed = parent.computed.clone();
        for c in schema.computed {
            match computed.iter().position(|p| p.name() == c.name()) {
                Some(i) => computed[i] = c,
                None => computed.push(c),
            }
        }

        let mut config = schema.config;
        config.populate_by_name |= parent.config.populate_by_name;
        if parent.config.extra == ExtraPolicy::Forbid {
            config.extra = ExtraPolicy::Forbid;
        }

        Ok(Schema {
            name: schema.name,
            parent: Some(parent_name),
            fields,
            computed,
            config,
        })
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered schema names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Constructs a record of the named schema.
    pub fn construct(&self, name: &str, input: &Value) -> SchemaResult<Record> {
        SchemaValidator::new(self).construct(name, input)
    }

    /// JSON description of a registered schema.
    pub fn describe(&self, name: &str) -> SchemaResult<Value> {
        self.get(name)
            .map(|s| s.describe())
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }
}
