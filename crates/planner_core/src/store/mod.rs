//! Key-value area holding one serialized array per collection slot.
//!
//! # Responsibility
//! - Define the storage seam used by collection repositories.
//! - Provide SQLite and in-memory implementations.
//!
//! # Invariants
//! - `set` replaces the whole value of a key in one write.
//! - Keys are opaque; the store never inspects values.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend refused the operation (lock poisoned, injected failure, ...).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Flat string key-value storage.
pub trait KeyValueStore {
    /// Returns the raw value stored at `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    /// Overwrites the value at `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    /// Deletes `key`; missing keys are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
