//! Typed field values held by constructed records.
//!
//! Values are produced by coercion during construction and are never
//! mutated afterwards. Conversion back to JSON happens through
//! [`FieldValue::to_json`].

use serde_json::{Map, Number, Value};

use super::record::Record;

/// A coerced, validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent optional value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (always finite)
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered sequence
    List(Vec<FieldValue>),
    /// String-keyed mapping in input order
    Map(Vec<(String, FieldValue)>),
    /// Nested record
    Record(Record),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats; everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Length used by length constraints: characters for strings, items for
    /// lists and maps.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Str(s) => Some(s.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Converts to JSON, expanding nested records with canonical names or
    /// declared aliases.
    pub fn to_json(&self, by_alias: bool) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().map(|v| v.to_json(by_alias)).collect())
            }
            FieldValue::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json(by_alias));
                }
                Value::Object(map)
            }
            FieldValue::Record(record) => record.to_mapping(by_alias),
        }
    }

    /// Checks whether a raw JSON input denotes this value.
    ///
    /// Numbers compare numerically, so `600000` matches `Float(600000.0)`.
    pub fn matches_json(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldValue::Int(_) | FieldValue::Float(_), Value::Number(n)) => {
                n.as_f64() == self.as_f64()
            }
            (FieldValue::List(items), Value::Array(raw)) => {
                items.len() == raw.len()
                    && items.iter().zip(raw).all(|(a, b)| a.matches_json(b))
            }
            (FieldValue::Map(entries), Value::Object(raw)) => {
                entries.len() == raw.len()
                    && entries
                        .iter()
                        .all(|(k, v)| raw.get(k).map_or(false, |r| v.matches_json(r)))
            }
            _ => self.to_json(false) == *value,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_length_counts_chars() {
        assert_eq!(FieldValue::from("héllo").length(), Some(5));
        assert_eq!(FieldValue::List(vec![FieldValue::Int(1)]).length(), Some(1));
        assert_eq!(FieldValue::Int(3).length(), None);
    }

    #[test]
    fn test_float_widening() {
        assert_eq!(FieldValue::Int(12).as_f64(), Some(12.0));
        assert_eq!(FieldValue::Int(12).as_i64(), Some(12));
        assert_eq!(FieldValue::Float(1.5).as_i64(), None);
    }

    #[test]
    fn test_to_json_preserves_map_order() {
        let value = FieldValue::Map(vec![
            ("zeta".into(), FieldValue::from("z")),
            ("alpha".into(), FieldValue::from("a")),
        ]);
        let json = value.to_json(false);
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_matches_json_numeric() {
        assert!(FieldValue::Float(600000.0).matches_json(&json!(600000)));
        assert!(FieldValue::Int(3).matches_json(&json!(3.0)));
        assert!(!FieldValue::Float(1.0).matches_json(&json!("1")));
        assert!(FieldValue::from("a b").matches_json(&json!("a b")));
    }
}
