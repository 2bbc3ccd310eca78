#![allow(dead_code)]

use planner_core::{
    ContactsError, ContactsSource, DeviceContact, DispatchError, PermissionStatus, UrlDispatcher,
};

/// Records opened URLs; can pretend a scheme is missing or failing.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    pub unsupported: bool,
    pub open_error: Option<String>,
    pub opened: Vec<String>,
}

impl RecordingDispatcher {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }
}

impl UrlDispatcher for RecordingDispatcher {
    fn can_open(&self, _url: &str) -> bool {
        !self.unsupported
    }

    fn open(&mut self, url: &str) -> Result<(), DispatchError> {
        if let Some(message) = &self.open_error {
            return Err(DispatchError::new(message.clone()));
        }
        self.opened.push(url.to_string());
        Ok(())
    }
}

/// Address book with a fixed permission answer.
pub struct FakeAddressBook {
    pub permission: PermissionStatus,
    pub contacts: Vec<DeviceContact>,
    pub fetch_error: Option<String>,
}

impl FakeAddressBook {
    pub fn granted(contacts: Vec<DeviceContact>) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            contacts,
            fetch_error: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            contacts: Vec::new(),
            fetch_error: None,
        }
    }
}

impl ContactsSource for FakeAddressBook {
    fn request_permission(&mut self) -> PermissionStatus {
        self.permission
    }

    fn fetch_contacts(&mut self) -> Result<Vec<DeviceContact>, ContactsError> {
        match &self.fetch_error {
            Some(message) => Err(ContactsError::new(message.clone())),
            None => Ok(self.contacts.clone()),
        }
    }
}
