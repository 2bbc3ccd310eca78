//! Domain model for the guest list and the expense list.
//!
//! # Responsibility
//! - Define the two persisted entity shapes and their wire format.
//! - Own draft validation for create/edit flows.
//!
//! # Invariants
//! - Every entity is identified by a non-empty opaque `EntityId`.
//! - Wire field names and enum values are fixed; stored arrays carry no
//!   version field.

pub mod entity;
pub mod expense;
pub mod id;
pub mod person;
pub mod validation;
