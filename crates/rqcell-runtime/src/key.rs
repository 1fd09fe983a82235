//! Cache keys
//!
//! A key is the pair `[operationName, variables]`. Variables are stored in
//! canonical form (object keys sorted at every level) so two maps with the
//! same entries always produce the same key, whatever their insertion order.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::{Map, Value};

use crate::Variables;
use crate::document::QueryDocument;

#[derive(Debug, Clone)]
pub struct QueryKey {
    operation: Option<String>,
    variables: Value,
    canonical: String,
}

impl QueryKey {
    pub fn new(operation: Option<&str>, variables: &Variables) -> Self {
        let variables = canonicalize(&Value::Object(variables.clone()));
        let canonical = variables.to_string();
        Self {
            operation: operation.map(str::to_string),
            variables,
            canonical,
        }
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Canonical variables
    pub fn variables(&self) -> &Value {
        &self.variables
    }

    /// `[operationName, variables]` as JSON
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            self.operation
                .as_ref()
                .map_or(Value::Null, |name| Value::String(name.clone())),
            self.variables.clone(),
        ])
    }
}

/// Build the cache key for a document and its variables.
///
/// Pure: identical inputs give identical keys on every call.
pub fn build_query_key(document: &QueryDocument, variables: &Variables) -> QueryKey {
    QueryKey::new(document.operation_name(), variables)
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

impl PartialEq for QueryKey {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.canonical == other.canonical
    }
}

impl Eq for QueryKey {}

impl Hash for QueryKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.operation.hash(state);
        self.canonical.hash(state);
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl Serialize for QueryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.operation)?;
        tuple.serialize_element(&self.variables)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(value: Value) -> Variables {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = QueryKey::new(Some("Q"), &vars(json!({ "b": 1, "a": { "y": 2, "x": 1 } })));
        let b = QueryKey::new(Some("Q"), &vars(json!({ "a": { "x": 1, "y": 2 }, "b": 1 })));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn display_and_serialize_as_pair() {
        let key = QueryKey::new(Some("PostsQuery"), &vars(json!({ "limit": 5 })));
        assert_eq!(key.to_string(), r#"["PostsQuery",{"limit":5}]"#);
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            json!(["PostsQuery", { "limit": 5 }])
        );
    }

    #[test]
    fn anonymous_operations_use_null() {
        let key = QueryKey::new(None, &Variables::new());
        assert_eq!(key.to_string(), "[null,{}]");
    }

    #[test]
    fn different_variables_differ() {
        let a = QueryKey::new(Some("Q"), &vars(json!({ "id": 1 })));
        let b = QueryKey::new(Some("Q"), &vars(json!({ "id": 2 })));
        let c = QueryKey::new(Some("P"), &vars(json!({ "id": 1 })));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
