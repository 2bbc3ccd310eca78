//! Device contacts import seam.
//!
//! # Responsibility
//! - Define the read-only contacts source used by guest import.
//! - Map picked contacts into new guest records.
//!
//! # Invariants
//! - Contacts with blank names are never offered for import.
//! - Imported guests start as shared-side and not invited.

use crate::model::id::EntityId;
use crate::model::person::{Person, Side};
use crate::view::{contains_needle, search_needle};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of asking the platform for contacts access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// One phone entry of a device contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPhone {
    pub number: Option<String>,
    pub label: Option<String>,
}

impl ContactPhone {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: Some(number.into()),
            label: None,
        }
    }
}

/// Contact record as returned by the device address book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceContact {
    pub id: String,
    pub name: String,
    pub phone_numbers: Vec<ContactPhone>,
}

impl DeviceContact {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone_numbers: Vec::new(),
        }
    }

    pub fn with_phone(mut self, number: impl Into<String>) -> Self {
        self.phone_numbers.push(ContactPhone::new(number));
        self
    }

    /// First phone number, or `""` when the contact has none.
    pub fn primary_phone(&self) -> &str {
        self.phone_numbers
            .first()
            .and_then(|phone| phone.number.as_deref())
            .unwrap_or("")
    }

    /// Builds the guest record created by importing this contact.
    pub fn to_person(&self) -> Person {
        Person {
            id: EntityId::generate(),
            name: self.name.trim().to_string(),
            phone: self.primary_phone().to_string(),
            invited: false,
            side: Side::Shared,
            notes: String::new(),
        }
    }
}

/// Failure while reading the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsError {
    pub message: String,
}

impl ContactsError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ContactsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "contacts unavailable: {}", self.message)
    }
}

impl Error for ContactsError {}

/// Platform address book.
pub trait ContactsSource {
    /// Prompts for (or checks) read access.
    fn request_permission(&mut self) -> PermissionStatus;
    /// Reads all contacts with names and phone numbers.
    fn fetch_contacts(&mut self) -> Result<Vec<DeviceContact>, ContactsError>;
}

/// Drops blank-named contacts and fills missing ids.
pub fn importable_contacts(contacts: Vec<DeviceContact>) -> Vec<DeviceContact> {
    contacts
        .into_iter()
        .filter(|contact| !contact.name.trim().is_empty())
        .map(|mut contact| {
            if contact.id.trim().is_empty() {
                contact.id = EntityId::generate().to_string();
            }
            contact
        })
        .collect()
}

/// Contact picker search: case-insensitive substring over names.
pub fn filter_contacts<'a>(contacts: &'a [DeviceContact], query: &str) -> Vec<&'a DeviceContact> {
    let Some(needle) = search_needle(query) else {
        return contacts.iter().collect();
    };
    contacts
        .iter()
        .filter(|contact| contains_needle(&contact.name, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_contacts, importable_contacts, DeviceContact};
    use crate::model::person::Side;

    #[test]
    fn blank_names_are_dropped_and_missing_ids_filled() {
        let contacts = importable_contacts(vec![
            DeviceContact::new("c1", "Ali"),
            DeviceContact::new("c2", "   "),
            DeviceContact::new("", "Berk"),
        ]);
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].id, "c1");
        assert!(!contacts[1].id.is_empty());
    }

    #[test]
    fn imported_person_takes_first_phone_or_empty() {
        let with_phone = DeviceContact::new("c1", " Ali ")
            .with_phone("+90 555 000 00 00")
            .with_phone("0212 000 00 00")
            .to_person();
        assert_eq!(with_phone.name, "Ali");
        assert_eq!(with_phone.phone, "+90 555 000 00 00");
        assert_eq!(with_phone.side, Side::Shared);
        assert!(!with_phone.invited);

        let without_phone = DeviceContact::new("c2", "Berk").to_person();
        assert_eq!(without_phone.phone, "");
    }

    #[test]
    fn picker_search_filters_by_name() {
        let contacts = vec![DeviceContact::new("1", "Ali Veli"), DeviceContact::new("2", "Berk")];
        assert_eq!(filter_contacts(&contacts, "VEL").len(), 1);
        assert_eq!(filter_contacts(&contacts, "").len(), 2);
    }
}
