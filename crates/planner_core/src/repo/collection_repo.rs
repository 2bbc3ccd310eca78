//! Whole-array collection repository over one key-value slot.
//!
//! # Responsibility
//! - Own the authoritative in-memory copy of one entity collection.
//! - Load and save the full array as JSON under a fixed key.
//! - Quarantine malformed records found at load time.
//!
//! # Invariants
//! - Writes always replace the whole slot; there are no partial updates.
//! - In-memory state changes only after the slot write succeeded.
//! - Mutations require `LoadState::Loaded`.
//! - All mutations take `&mut self`, so there is one writer per collection
//!   and the last completed save is the persisted state.
//! - A malformed record leaves the main slot only after it is stored in the
//!   quarantine slot.

use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::model::validation::ValidationError;
use crate::store::{KeyValueStore, StoreError};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Suffix of the side slot that receives quarantined records.
pub const QUARANTINE_SUFFIX: &str = ".quarantine";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for collection load/save/mutation.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    Serialization(serde_json::Error),
    /// An entity about to be written fails its own invariants.
    Validation(ValidationError),
    /// Slot exists but does not hold a JSON array.
    InvalidData(String),
    NotFound(EntityId),
    /// Mutation attempted before a successful load.
    NotLoaded,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "collection serialization failed: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted collection: {message}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::NotLoaded => write!(f, "collection has not been loaded"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidData(_) | Self::NotFound(_) | Self::NotLoaded => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Lifecycle of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

/// Record removed from the main slot because it failed schema checks.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    /// Position in the stored array.
    pub index: usize,
    pub raw: Value,
    pub reason: String,
}

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub quarantined: Vec<QuarantinedRecord>,
    /// Set when quarantined records could not be moved out of the main slot
    /// yet. The move is retried before the next save.
    pub quarantine_error: Option<String>,
}

/// Repository holding one entity collection mirrored to one slot.
pub struct CollectionRepository<E: Entity, S: KeyValueStore> {
    store: S,
    key: String,
    items: Vec<E>,
    state: LoadState,
    /// Malformed records still waiting for the quarantine slot.
    pending_quarantine: Vec<Value>,
}

impl<E: Entity, S: KeyValueStore> CollectionRepository<E, S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            items: Vec::new(),
            state: LoadState::Unloaded,
            pending_quarantine: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn quarantine_key(&self) -> String {
        format!("{}{QUARANTINE_SUFFIX}", self.key)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Current collection in persisted order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Reads the slot and replaces the in-memory collection.
    ///
    /// Missing slot loads as an empty collection. Elements that fail to
    /// deserialize or validate are appended to the quarantine slot and the
    /// main slot is rewritten without them. When either write fails the
    /// valid records still load and `LoadReport::quarantine_error` is set.
    ///
    /// # Errors
    /// - Store read failures.
    /// - Slot value that is not a JSON array.
    ///
    /// On error the in-memory collection and load state are unchanged.
    pub fn load(&mut self) -> RepoResult<LoadReport> {
        let result = self.read_slot();
        match &result {
            Ok(report) => info!(
                "event=collection_load module=repo status=ok kind={} key={} loaded={} quarantined={}",
                E::KIND,
                self.key,
                report.loaded,
                report.quarantined.len()
            ),
            Err(err) => error!(
                "event=collection_load module=repo status=error kind={} key={} error={}",
                E::KIND,
                self.key,
                err
            ),
        }
        result
    }

    /// Overwrites the slot with `entities` and commits them in memory.
    ///
    /// # Errors
    /// - `NotLoaded` before the first successful load.
    /// - `Validation` when any entity breaks its invariants.
    /// - Serialization or store failures, including a pending quarantine
    ///   move that still cannot be written; memory is left unchanged.
    pub fn save(&mut self, entities: Vec<E>) -> RepoResult<()> {
        self.ensure_loaded()?;
        if let Err(err) = self
            .flush_pending_quarantine()
            .and_then(|()| self.write_slot(&entities))
        {
            error!(
                "event=collection_save module=repo status=error kind={} key={} count={} error={}",
                E::KIND,
                self.key,
                entities.len(),
                err
            );
            return Err(err);
        }

        info!(
            "event=collection_save module=repo status=ok kind={} key={} count={}",
            E::KIND,
            self.key,
            entities.len()
        );
        self.items = entities;
        Ok(())
    }

    /// Applies `change` to a copy of the collection, saves it and commits.
    ///
    /// `change` errors abort before any write.
    pub fn mutate<T, Err, F>(&mut self, change: F) -> Result<T, Err>
    where
        F: FnOnce(&mut Vec<E>) -> Result<T, Err>,
        Err: From<RepoError>,
    {
        self.ensure_loaded()?;
        let mut next = self.items.clone();
        let output = change(&mut next)?;
        self.save(next)?;
        Ok(output)
    }

    /// Runs `change` on the record with `id` and persists the collection.
    pub fn update_one<T, Err, F>(&mut self, id: &EntityId, change: F) -> Result<T, Err>
    where
        F: FnOnce(&mut E) -> Result<T, Err>,
        Err: From<RepoError>,
    {
        self.mutate(|items| {
            let item = items
                .iter_mut()
                .find(|item| item.id() == id)
                .ok_or_else(|| RepoError::NotFound(id.clone()))?;
            change(item)
        })
    }

    /// Removes the record with `id` and persists the collection.
    pub fn remove_one(&mut self, id: &EntityId) -> RepoResult<E> {
        self.mutate(|items| {
            let position = items
                .iter()
                .position(|item| item.id() == id)
                .ok_or_else(|| RepoError::NotFound(id.clone()))?;
            Ok(items.remove(position))
        })
    }

    fn ensure_loaded(&self) -> RepoResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(RepoError::NotLoaded)
        }
    }

    fn read_slot(&mut self) -> RepoResult<LoadReport> {
        let Some(raw) = self.store.get(&self.key)? else {
            self.items = Vec::new();
            self.pending_quarantine = Vec::new();
            self.state = LoadState::Loaded;
            return Ok(LoadReport::default());
        };

        let Value::Array(values) = serde_json::from_str::<Value>(&raw)? else {
            return Err(RepoError::InvalidData(format!(
                "slot `{}` does not hold a JSON array",
                self.key
            )));
        };

        let mut items = Vec::with_capacity(values.len());
        let mut quarantined = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match decode_record::<E>(&value) {
                Ok(item) => items.push(item),
                Err(reason) => quarantined.push(QuarantinedRecord {
                    index,
                    raw: value,
                    reason,
                }),
            }
        }

        let mut pending = Vec::new();
        let mut quarantine_error = None;
        if !quarantined.is_empty() {
            for record in &quarantined {
                warn!(
                    "event=collection_quarantine module=repo status=warn kind={} key={} index={} reason={}",
                    E::KIND,
                    self.key,
                    record.index,
                    record.reason
                );
            }
            let raws = quarantined
                .iter()
                .map(|record| record.raw.clone())
                .collect::<Vec<_>>();
            let moved = match self.append_quarantine(&raws) {
                Ok(()) => self.write_slot(&items),
                Err(err) => {
                    pending = raws;
                    Err(err)
                }
            };
            if let Err(err) = moved {
                warn!(
                    "event=collection_quarantine module=repo status=degraded kind={} key={} pending={} error={}",
                    E::KIND,
                    self.key,
                    pending.len(),
                    err
                );
                quarantine_error = Some(err.to_string());
            }
        }

        let report = LoadReport {
            loaded: items.len(),
            quarantined,
            quarantine_error,
        };
        self.items = items;
        self.pending_quarantine = pending;
        self.state = LoadState::Loaded;
        Ok(report)
    }

    fn write_slot(&self, entities: &[E]) -> RepoResult<()> {
        for entity in entities {
            entity.validate()?;
        }
        let payload = serde_json::to_string(entities)?;
        self.store.set(&self.key, &payload)?;
        Ok(())
    }

    fn flush_pending_quarantine(&mut self) -> RepoResult<()> {
        if self.pending_quarantine.is_empty() {
            return Ok(());
        }
        self.append_quarantine(&self.pending_quarantine)?;
        info!(
            "event=collection_quarantine module=repo status=ok kind={} key={} flushed={}",
            E::KIND,
            self.key,
            self.pending_quarantine.len()
        );
        self.pending_quarantine.clear();
        Ok(())
    }

    fn append_quarantine(&self, raws: &[Value]) -> RepoResult<()> {
        let quarantine_key = self.quarantine_key();
        let mut held = match self.store.get(&quarantine_key)? {
            Some(raw) => match serde_json::from_str::<Value>(&raw)? {
                Value::Array(values) => values,
                other => vec![other],
            },
            None => Vec::new(),
        };

        held.extend(raws.iter().cloned());

        self.store
            .set(&quarantine_key, &serde_json::to_string(&held)?)?;
        Ok(())
    }
}

fn decode_record<E: Entity>(value: &Value) -> Result<E, String> {
    let item = E::deserialize(value).map_err(|err| err.to_string())?;
    item.validate().map_err(|err| err.to_string())?;
    Ok(item)
}
