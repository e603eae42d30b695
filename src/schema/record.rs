//! Immutable validated records
//!
//! A record is only ever produced by [`super::SchemaValidator::construct`].
//! There are no setters; values live as long as the record does.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::types::Schema;
use super::value::FieldValue;

/// An immutable instance of a schema.
///
/// Stored values are kept in field declaration order, parallel to
/// `schema.fields`.
#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<FieldValue>,
}

impl Record {
    pub(crate) fn new(schema: Arc<Schema>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(schema.fields.len(), values.len());
        Self { schema, values }
    }

    /// Name of the schema this record was constructed from
    pub fn schema_name(&self) -> &str {
        &self.schema.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Stored field value by canonical name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn list(&self, name: &str) -> Option<&[FieldValue]> {
        self.get(name).and_then(FieldValue::as_list)
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(FieldValue::as_record)
    }

    /// Evaluates a computed field. Never cached.
    pub fn computed(&self, name: &str) -> Option<FieldValue> {
        self.schema.get_computed(name).map(|c| c.evaluate(self))
    }

    /// Stored fields as (canonical name, value) pairs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.schema
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }

    /// Plain JSON mapping of stored and computed fields.
    ///
    /// Keys are canonical names, or declared aliases when `by_alias` is set.
    /// Nested records and sequences are expanded recursively. Computed fields
    /// follow the stored fields.
    pub fn to_mapping(&self, by_alias: bool) -> Value {
        let mut map = Map::with_capacity(self.values.len() + self.schema.computed.len());
        for (field, value) in self.schema.fields.iter().zip(&self.values) {
            map.insert(field.output_key(by_alias).to_string(), value.to_json(by_alias));
        }
        for computed in &self.schema.computed {
            map.insert(computed.name().to_string(), computed.evaluate(self).to_json(by_alias));
        }
        Value::Object(map)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.schema.name);
        for (name, value) in self.fields() {
            s.field(name, value);
        }
        s.finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.schema.name, self.to_mapping(false))
    }
}
