//! State container: schema with per-field merge policy, immutable state values, partial updates.
//!
//! A graph declares its fields once in a [`StateSchema`]; each field either replaces its old
//! value on write ([`MergePolicy::Replace`]) or accumulates an ordered list
//! ([`MergePolicy::Append`]). Nodes return a [`StateUpdate`]; the executor folds it into the
//! current [`State`] with [`State::apply_update`], which yields a new state and leaves the old
//! one untouched so snapshots can be checkpointed as-is.

mod schema;
mod update;
mod values;

pub use schema::{MergePolicy, StateSchema};
pub use update::StateUpdate;
pub use values::State;

use thiserror::Error;

/// Error raised while building or merging state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// The update names a field the schema does not declare.
    #[error("schema violation: unknown state field `{0}`")]
    SchemaViolation(String),

    /// A JSON value used as an update was not an object.
    #[error("state update must be a JSON object, got {0}")]
    NotAnObject(String),

    /// A field could not be decoded into the type a node expected.
    #[error("field `{field}`: {message}")]
    Decode { field: String, message: String },

    /// A value could not be serialized into a field.
    #[error("field `{field}`: cannot encode: {message}")]
    Encode { field: String, message: String },
}
