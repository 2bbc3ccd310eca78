//! List use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, selection and collaborator calls into the
//!   operations a list screen triggers.
//! - Classify failures into user-facing and diagnostic categories.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - A failed operation leaves both the collection and the selection as
//!   they were.

pub mod expense_service;
pub mod guest_service;

use crate::contacts::ContactsError;
use crate::messaging::MessagingError;
use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::model::validation::ValidationError;
use crate::repo::collection_repo::{CollectionRepository, RepoError};
use crate::selection::BulkSelection;
use crate::store::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse failure category used by the UI to pick a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing user input; shown as a blocking message.
    Validation,
    /// Storage or serialization failure; logged, not shown.
    Persistence,
    /// Contacts permission refused.
    PermissionDenied,
    /// Messaging app or platform capability missing.
    CapabilityUnavailable,
}

/// Service error for list use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Validation(ValidationError),
    /// Bulk action invoked with nothing selected.
    EmptySelection,
    /// Bulk message body is blank.
    EmptyMessage,
    /// None of the selected people has a phone number.
    NoRecipients,
    /// Single-person message target has no phone number.
    MissingPhone(EntityId),
    NotFound(EntityId),
    /// List was never loaded successfully.
    NotLoaded,
    PermissionDenied,
    Contacts(ContactsError),
    Messaging(MessagingError),
    Persistence(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::EmptySelection
            | Self::EmptyMessage
            | Self::NoRecipients
            | Self::MissingPhone(_)
            | Self::NotFound(_) => ErrorKind::Validation,
            Self::NotLoaded | Self::Persistence(_) => ErrorKind::Persistence,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::Contacts(_) | Self::Messaging(_) => ErrorKind::CapabilityUnavailable,
        }
    }

    /// Whether the UI should show this failure to the user.
    pub fn is_user_facing(&self) -> bool {
        self.kind() != ErrorKind::Persistence
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptySelection => write!(f, "please select at least one item"),
            Self::EmptyMessage => write!(f, "please write a message"),
            Self::NoRecipients => write!(f, "none of the selected people has a phone number"),
            Self::MissingPhone(id) => write!(f, "person {id} has no phone number"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::NotLoaded => write!(f, "list is not loaded"),
            Self::PermissionDenied => {
                write!(f, "contacts permission is required to import people")
            }
            Self::Contacts(err) => write!(f, "{err}"),
            Self::Messaging(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Contacts(err) => Some(err),
            Self::Messaging(err) => Some(err),
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::NotLoaded => Self::NotLoaded,
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<MessagingError> for ServiceError {
    fn from(value: MessagingError) -> Self {
        Self::Messaging(value)
    }
}

/// What a single tap on a list row did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Bulk mode: row membership toggled.
    SelectionToggled { selected: bool },
    /// Normal mode: `invited`/`paid` flipped to `value`.
    FlagToggled { value: bool },
}

/// Removes every selected record, persists, and leaves selection mode.
pub(crate) fn delete_selected<E, S>(
    repo: &mut CollectionRepository<E, S>,
    selection: &mut BulkSelection,
) -> ServiceResult<usize>
where
    E: Entity,
    S: KeyValueStore,
{
    if selection.is_empty() {
        warn!(
            "event=bulk_delete module=service status=rejected kind={} reason=empty_selection",
            E::KIND
        );
        return Err(ServiceError::EmptySelection);
    }

    let removed = repo.mutate(|items| {
        let before = items.len();
        items.retain(|item| !selection.contains(item.id()));
        Ok::<_, ServiceError>(before - items.len())
    })?;
    info!(
        "event=bulk_delete module=service status=ok kind={} selected={} removed={}",
        E::KIND,
        selection.len(),
        removed
    );
    selection.exit();
    Ok(removed)
}
