//! Per-field merge policy table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{State, StateError, StateUpdate};

/// How a field combines a node's write with its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The new value overwrites the old one.
    Replace,
    /// The new value(s) are appended to the field's ordered list.
    Append,
}

#[derive(Debug, Clone, PartialEq)]
struct FieldSpec {
    policy: MergePolicy,
    default: Value,
}

/// Declared state fields and their merge policies.
///
/// Frozen into the compiled graph, so a field's policy never changes during a run.
///
/// ```rust
/// use stategraph::{MergePolicy, StateSchema};
///
/// let schema = StateSchema::new().append("messages").replace("route");
/// assert_eq!(schema.policy("messages"), Some(MergePolicy::Append));
/// assert_eq!(schema.policy("unknown"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateSchema {
    fields: BTreeMap<String, FieldSpec>,
}

impl StateSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a `Replace` field starting at `null`.
    pub fn replace(self, field: impl Into<String>) -> Self {
        self.replace_with_default(field, Value::Null)
    }

    /// Declares a `Replace` field with an initial value.
    pub fn replace_with_default(mut self, field: impl Into<String>, default: Value) -> Self {
        self.fields.insert(
            field.into(),
            FieldSpec {
                policy: MergePolicy::Replace,
                default,
            },
        );
        self
    }

    /// Declares an `Append` field starting as an empty list.
    pub fn append(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(
            field.into(),
            FieldSpec {
                policy: MergePolicy::Append,
                default: Value::Array(Vec::new()),
            },
        );
        self
    }

    /// Merge policy of `field`, or `None` if it is not declared.
    pub fn policy(&self, field: &str) -> Option<MergePolicy> {
        self.fields.get(field).map(|f| f.policy)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, MergePolicy)> {
        self.fields.iter().map(|(k, f)| (k.as_str(), f.policy))
    }

    /// State holding every field's default.
    pub fn defaults(&self) -> State {
        State::from_values(
            self.fields
                .iter()
                .map(|(k, f)| (k.clone(), f.default.clone()))
                .collect(),
        )
    }

    /// First state of a run: the caller's input applied as an ordinary update to the defaults.
    pub fn initial_state(&self, input: &StateUpdate) -> Result<State, StateError> {
        self.defaults().apply_update(self, input)
    }
}
