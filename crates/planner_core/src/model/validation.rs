//! Validation errors for drafts and persisted records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected user input or malformed persisted record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Persisted record without an id.
    EmptyId,
    /// Person name is blank after trimming.
    EmptyName,
    /// Expense title is blank after trimming.
    EmptyTitle,
    /// Expense amount text is blank.
    EmptyAmount,
    /// Amount text is not a positive number.
    InvalidAmount { input: String },
    /// Stored amount is zero, negative or not finite.
    AmountOutOfRange(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id cannot be empty"),
            Self::EmptyName => write!(f, "please enter a name"),
            Self::EmptyTitle => write!(f, "please enter a title"),
            Self::EmptyAmount => write!(f, "please enter an amount"),
            Self::InvalidAmount { input } => {
                write!(f, "please enter a valid amount (got `{input}`)")
            }
            Self::AmountOutOfRange(value) => {
                write!(f, "amount must be a positive number, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}
