//! Immutable state values and reducer application.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MergePolicy, StateError, StateSchema, StateUpdate};

/// Current values of a run's state fields.
///
/// Only changed through [`State::apply_update`], which returns a new state; the receiver is
/// never modified, so a clone handed to a checkpoint or a stream consumer stays valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: BTreeMap<String, Value>,
}

impl State {
    pub(crate) fn from_values(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// String value of `field`, if it holds one.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(Value::as_str)
    }

    /// List value of `field`; an `Append` field always holds one.
    pub fn get_list(&self, field: &str) -> Option<&Vec<Value>> {
        self.values.get(field).and_then(Value::as_array)
    }

    /// Decodes `field` into `T`.
    pub fn decode<T: DeserializeOwned>(&self, field: &str) -> Result<T, StateError> {
        let value = self
            .values
            .get(field)
            .ok_or_else(|| StateError::SchemaViolation(field.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|e| StateError::Decode {
            field: field.to_string(),
            message: e.to_string(),
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Folds `update` into a copy of this state using the schema's merge policies.
    ///
    /// `Replace` fields take the new value. `Append` fields extend their list with the
    /// elements of a JSON array, or push any other value as a single element. Fails with
    /// [`StateError::SchemaViolation`] on the first undeclared field; `self` is unchanged
    /// either way.
    pub fn apply_update(
        &self,
        schema: &StateSchema,
        update: &StateUpdate,
    ) -> Result<State, StateError> {
        let mut values = self.values.clone();
        for (field, value) in update.iter() {
            let policy = schema
                .policy(field)
                .ok_or_else(|| StateError::SchemaViolation(field.clone()))?;
            match policy {
                MergePolicy::Replace => {
                    values.insert(field.clone(), value.clone());
                }
                MergePolicy::Append => {
                    let slot = values
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    append_value(slot, value.clone());
                }
            }
        }
        Ok(State { values })
    }
}

fn append_value(slot: &mut Value, value: Value) {
    if !slot.is_array() {
        let previous = std::mem::take(slot);
        *slot = Value::Array(if previous.is_null() {
            Vec::new()
        } else {
            vec![previous]
        });
    }
    if let Value::Array(items) = slot {
        match value {
            Value::Array(new_items) => items.extend(new_items),
            other => items.push(other),
        }
    }
}
