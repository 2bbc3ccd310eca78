//! Shared contract for persisted list entities.

use crate::model::id::EntityId;
use crate::model::validation::ValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record stored as one element of a collection slot.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Short lowercase name used in log events (`person`, `expense`).
    const KIND: &'static str;

    fn id(&self) -> &EntityId;

    /// Checks invariants that must hold for every persisted record.
    fn validate(&self) -> Result<(), ValidationError>;
}
