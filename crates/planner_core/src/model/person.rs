//! Guest list entity.
//!
//! # Responsibility
//! - Define the `Person` record persisted in the people slot.
//! - Validate and normalize `PersonDraft` input from add/edit forms.
//!
//! # Invariants
//! - `name` is never blank for a persisted person.
//! - `phone` and `notes` use `""` for "not set"; they are never `null`.
//! - `side` serializes as `gelin | damat | ortak`.

use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Which family a guest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// Bride's side.
    #[serde(rename = "gelin")]
    Bride,
    /// Groom's side.
    #[serde(rename = "damat")]
    Groom,
    /// Shared by both families.
    #[default]
    #[serde(rename = "ortak")]
    Shared,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Bride, Side::Groom, Side::Shared];

    /// Wire value stored in the `side` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bride => "gelin",
            Self::Groom => "damat",
            Self::Shared => "ortak",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bride => "Gelin",
            Self::Groom => "Damat",
            Self::Shared => "Ortak",
        }
    }
}

/// One person on the guest list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    /// Free-form phone text; `""` when unknown.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub invited: bool,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub notes: String,
}

impl Person {
    /// Builds a new, not-yet-invited person from a validated draft.
    pub fn from_draft(id: EntityId, draft: &PersonDraft) -> Result<Self, ValidationError> {
        let draft = draft.normalized()?;
        Ok(Self {
            id,
            name: draft.name,
            phone: draft.phone,
            invited: false,
            side: draft.side,
            notes: draft.notes,
        })
    }

    /// Replaces the editable fields; `id` and `invited` are preserved.
    ///
    /// Leaves `self` untouched when the draft is invalid.
    pub fn apply_draft(&mut self, draft: &PersonDraft) -> Result<(), ValidationError> {
        let draft = draft.normalized()?;
        self.name = draft.name;
        self.phone = draft.phone;
        self.side = draft.side;
        self.notes = draft.notes;
        Ok(())
    }

    /// Returns a form draft pre-filled with this person's fields.
    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            side: self.side,
            notes: self.notes.clone(),
        }
    }
}

impl Entity for Person {
    const KIND: &'static str = "person";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_blank() {
            return Err(ValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Raw add/edit form input for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub phone: String,
    pub side: Side,
    pub notes: String,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Returns a trimmed copy, or the first validation failure.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            phone: self.phone.trim().to_string(),
            side: self.side,
            notes: self.notes.trim().to_string(),
        })
    }
}
