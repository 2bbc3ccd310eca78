//! Repository layer over key-value collection slots.
//!
//! # Responsibility
//! - Mirror each entity collection to exactly one storage slot.
//! - Keep JSON encoding and slot keys inside the persistence boundary.
//!
//! # Invariants
//! - Repository writes must enforce `Entity::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `NotLoaded`) in
//!   addition to storage errors.

pub mod collection_repo;
