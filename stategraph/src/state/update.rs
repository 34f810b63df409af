//! Partial state update returned by nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::StateError;

/// Field writes produced by one node invocation. Fields not present are left untouched.
///
/// Insertion order is irrelevant to the merge: each field is reduced independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateUpdate {
    values: Map<String, Value>,
}

impl StateUpdate {
    /// Empty update (the node changes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field write (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Adds a field write in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    /// Adds a field write from any serializable value (builder style).
    pub fn set_serialized<T: Serialize + ?Sized>(
        self,
        field: impl Into<String>,
        value: &T,
    ) -> Result<Self, StateError> {
        let field = field.into();
        let value = serde_json::to_value(value).map_err(|e| StateError::Encode {
            field: field.clone(),
            message: e.to_string(),
        })?;
        Ok(self.set(field, value))
    }

    /// Builds an update from a JSON object; any other JSON value is rejected.
    pub fn from_json(value: Value) -> Result<Self, StateError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            other => Err(StateError::NotAnObject(other.to_string())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<Map<String, Value>> for StateUpdate {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StateUpdate {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
