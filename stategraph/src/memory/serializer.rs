//! Serializer for persisted records (value <-> bytes).
//!
//! Used by persistent checkpointers; `MemorySaver` keeps records as values and does not
//! need one.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::CheckpointError;

/// Serializes and deserializes values for checkpoint storage.
pub trait Serializer<T>: Send + Sync {
    fn serialize(&self, value: &T) -> Result<Vec<u8>, CheckpointError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<T, CheckpointError>;
}

/// JSON-based serializer. Default for [`SqliteSaver`](super::SqliteSaver).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl<T> Serializer<T> for JsonSerializer
where
    T: Serialize + DeserializeOwned,
{
    fn serialize(&self, value: &T) -> Result<Vec<u8>, CheckpointError> {
        serde_json::to_vec(value).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CheckpointError> {
        serde_json::from_slice(bytes).map_err(|e| CheckpointError::Serialization(e.to_string()))
    }
}
