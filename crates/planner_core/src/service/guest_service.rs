//! Guest list use-case service.
//!
//! # Responsibility
//! - Create, edit, delete and flag guests through the people repository.
//! - Drive bulk selection, bulk delete and bulk SMS.
//! - Import guests from the device address book.
//!
//! # Invariants
//! - Every mutation round-trips the full people slot.
//! - Bulk SMS only ever addresses selected people that have a phone.
//! - Log events carry ids and counts, never names, phones or notes.

use crate::config::{PlannerConfig, DEFAULT_COUNTRY_CODE};
use crate::contacts::{importable_contacts, ContactsSource, DeviceContact, PermissionStatus};
use crate::messaging::{
    dispatch, sms_batch_link, sms_number, whatsapp_link, Channel, SmsLinkStyle, UrlDispatcher,
};
use crate::model::id::EntityId;
use crate::model::person::{Person, PersonDraft};
use crate::repo::collection_repo::{CollectionRepository, LoadReport, LoadState};
use crate::selection::BulkSelection;
use crate::service::{delete_selected, ServiceError, ServiceResult, TapOutcome};
use crate::store::KeyValueStore;
use crate::view::people::{filter_people, people_stats, PeopleFilter, PeopleStats};
use log::{error, info, warn};

/// One resolved bulk SMS recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRecipient {
    pub person_id: EntityId,
    /// Dialable number: digits and `+` only, never empty.
    pub number: String,
}

/// Bulk SMS ready for confirmation.
///
/// When `skipped > 0` the caller shows [`BulkSmsPlan::warning`] and either
/// sends the plan (continue with the subset) or drops it (cancel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSmsPlan {
    /// Recipients in guest list order.
    pub recipients: Vec<SmsRecipient>,
    /// Selected people left out because their phone has nothing dialable.
    pub skipped: usize,
    pub message: String,
}

impl BulkSmsPlan {
    pub fn needs_confirmation(&self) -> bool {
        self.skipped > 0
    }

    pub fn warning(&self) -> Option<String> {
        if self.skipped == 0 {
            return None;
        }
        Some(format!(
            "{} selected people have no usable phone number. Only {} will receive the SMS.",
            self.skipped,
            self.recipients.len()
        ))
    }
}

/// Guest list service over one people slot.
pub struct GuestListService<S: KeyValueStore> {
    repo: CollectionRepository<Person, S>,
    selection: BulkSelection,
    country_code: String,
    sms_style: SmsLinkStyle,
}

impl<S: KeyValueStore> GuestListService<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            repo: CollectionRepository::new(store, key),
            selection: BulkSelection::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            sms_style: SmsLinkStyle::default(),
        }
    }

    pub fn from_config(store: S, config: &PlannerConfig) -> Self {
        Self::new(store, config.people_key.clone())
            .with_country_code(config.default_country_code.clone())
            .with_sms_link_style(config.sms_link_style)
    }

    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = country_code.into();
        self
    }

    pub fn with_sms_link_style(mut self, style: SmsLinkStyle) -> Self {
        self.sms_style = style;
        self
    }

    /// Loads the people slot. Intended to run once when the screen mounts.
    pub fn load(&mut self) -> ServiceResult<LoadReport> {
        Ok(self.repo.load()?)
    }

    pub fn load_state(&self) -> LoadState {
        self.repo.state()
    }

    pub fn people(&self) -> &[Person] {
        self.repo.items()
    }

    pub fn person(&self, id: &EntityId) -> Option<&Person> {
        self.repo.get(id)
    }

    pub fn visible(&self, filter: PeopleFilter, query: &str) -> Vec<&Person> {
        filter_people(self.repo.items(), filter, query)
    }

    pub fn stats(&self) -> PeopleStats {
        people_stats(self.repo.items())
    }

    /// Validates `draft`, appends a new guest and persists.
    pub fn create(&mut self, draft: &PersonDraft) -> ServiceResult<Person> {
        let person = Person::from_draft(EntityId::generate(), draft)?;
        self.repo.mutate(|people| {
            people.push(person.clone());
            Ok::<_, ServiceError>(())
        })?;
        info!(
            "event=person_create module=service status=ok id={}",
            person.id
        );
        Ok(person)
    }

    /// Replaces the editable fields of guest `id`.
    pub fn update(&mut self, id: &EntityId, draft: &PersonDraft) -> ServiceResult<Person> {
        let updated = self.repo.update_one(id, |person: &mut Person| {
            person.apply_draft(draft)?;
            Ok::<_, ServiceError>(person.clone())
        })?;
        info!("event=person_update module=service status=ok id={id}");
        Ok(updated)
    }

    /// Pre-filled form input for editing guest `id`.
    pub fn edit_draft(&self, id: &EntityId) -> ServiceResult<PersonDraft> {
        self.repo
            .get(id)
            .map(Person::to_draft)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    /// Removes guest `id`. Confirmation happens in the UI beforehand.
    pub fn delete(&mut self, id: &EntityId) -> ServiceResult<()> {
        self.repo.remove_one(id)?;
        info!("event=person_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Flips `invited` and persists. Returns the new value.
    pub fn toggle_invited(&mut self, id: &EntityId) -> ServiceResult<bool> {
        let invited = self.repo.update_one(id, |person: &mut Person| {
            person.invited = !person.invited;
            Ok::<_, ServiceError>(person.invited)
        })?;
        info!("event=person_toggle_invited module=service status=ok id={id} invited={invited}");
        Ok(invited)
    }

    pub fn selection(&self) -> &BulkSelection {
        &self.selection
    }

    pub fn enter_selection(&mut self, seed: Option<EntityId>) {
        self.selection.enter(seed);
    }

    pub fn toggle_selection(&mut self, id: EntityId) -> bool {
        self.selection.toggle(id)
    }

    pub fn exit_selection(&mut self) {
        self.selection.exit();
    }

    /// Row tap: toggles selection in bulk mode, `invited` otherwise.
    pub fn tap(&mut self, id: &EntityId) -> ServiceResult<TapOutcome> {
        if self.selection.is_active() {
            let selected = self.selection.toggle(id.clone());
            return Ok(TapOutcome::SelectionToggled { selected });
        }
        let value = self.toggle_invited(id)?;
        Ok(TapOutcome::FlagToggled { value })
    }

    /// Row long-press: starts bulk mode seeded with `id`.
    ///
    /// Returns `false` when bulk mode was already active.
    pub fn long_press(&mut self, id: &EntityId) -> bool {
        if self.selection.is_active() {
            return false;
        }
        self.selection.enter(Some(id.clone()));
        true
    }

    /// Deletes every selected guest and leaves bulk mode.
    ///
    /// Returns the number of guests removed.
    pub fn bulk_delete(&mut self) -> ServiceResult<usize> {
        delete_selected(&mut self.repo, &mut self.selection)
    }

    /// Resolves selected guests into SMS recipients.
    ///
    /// A guest is a recipient only when their phone keeps at least one digit
    /// or `+` after normalization; everyone else selected counts as skipped.
    ///
    /// # Errors
    /// - `EmptySelection`, `EmptyMessage`, or `NoRecipients` when nobody
    ///   selected has a dialable phone number.
    pub fn prepare_bulk_sms(&self, message: &str) -> ServiceResult<BulkSmsPlan> {
        if self.selection.is_empty() {
            return Err(ServiceError::EmptySelection);
        }
        if message.trim().is_empty() {
            return Err(ServiceError::EmptyMessage);
        }

        let selected = self
            .repo
            .items()
            .iter()
            .filter(|person| self.selection.contains(&person.id))
            .collect::<Vec<_>>();
        let recipients = selected
            .iter()
            .filter_map(|person| {
                let number = sms_number(&person.phone);
                (!number.is_empty()).then(|| SmsRecipient {
                    person_id: person.id.clone(),
                    number,
                })
            })
            .collect::<Vec<_>>();

        if recipients.is_empty() {
            warn!(
                "event=bulk_sms_prepare module=service status=rejected selected={} reason=no_recipients",
                selected.len()
            );
            return Err(ServiceError::NoRecipients);
        }

        Ok(BulkSmsPlan {
            skipped: selected.len() - recipients.len(),
            recipients,
            message: message.to_string(),
        })
    }

    /// Opens one SMS composer link for every recipient of `plan`.
    ///
    /// On success bulk mode is left and the number of addresses placed in
    /// the link is returned.
    pub fn send_bulk_sms(
        &mut self,
        plan: &BulkSmsPlan,
        dispatcher: &mut dyn UrlDispatcher,
    ) -> ServiceResult<usize> {
        let numbers = plan
            .recipients
            .iter()
            .map(|recipient| sms_number(&recipient.number))
            .filter(|number| !number.is_empty())
            .collect::<Vec<_>>();
        let url = sms_batch_link(&numbers, &plan.message, self.sms_style)
            .ok_or(ServiceError::NoRecipients)?;
        dispatch(dispatcher, Channel::Sms, &url)?;

        info!(
            "event=bulk_sms_send module=service status=ok recipients={} skipped={}",
            numbers.len(),
            plan.skipped
        );
        self.selection.exit();
        Ok(numbers.len())
    }

    /// Opens a WhatsApp chat with guest `id` pre-filled with `message`.
    pub fn send_whatsapp(
        &self,
        id: &EntityId,
        message: &str,
        dispatcher: &mut dyn UrlDispatcher,
    ) -> ServiceResult<()> {
        let person = self
            .repo
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        let url = whatsapp_link(&person.phone, message, &self.country_code)
            .ok_or_else(|| ServiceError::MissingPhone(id.clone()))?;
        dispatch(dispatcher, Channel::WhatsApp, &url)?;
        Ok(())
    }

    /// Asks for contacts access and returns contacts that can be imported.
    pub fn read_device_contacts(
        &self,
        source: &mut dyn ContactsSource,
    ) -> ServiceResult<Vec<DeviceContact>> {
        if source.request_permission() == PermissionStatus::Denied {
            warn!("event=contacts_read module=service status=rejected reason=permission_denied");
            return Err(ServiceError::PermissionDenied);
        }
        let contacts = source.fetch_contacts().map_err(|err| {
            error!("event=contacts_read module=service status=error error={err}");
            ServiceError::Contacts(err)
        })?;
        let importable = importable_contacts(contacts);
        info!(
            "event=contacts_read module=service status=ok count={}",
            importable.len()
        );
        Ok(importable)
    }

    /// Appends one new guest per picked contact and persists once.
    pub fn import_contacts(&mut self, picked: &[DeviceContact]) -> ServiceResult<Vec<Person>> {
        let imported = picked
            .iter()
            .filter(|contact| !contact.name.trim().is_empty())
            .map(DeviceContact::to_person)
            .collect::<Vec<_>>();
        if imported.is_empty() {
            return Err(ServiceError::EmptySelection);
        }

        self.repo.mutate(|people| {
            people.extend(imported.iter().cloned());
            Ok::<_, ServiceError>(())
        })?;
        info!(
            "event=contacts_import module=service status=ok count={}",
            imported.len()
        );
        Ok(imported)
    }
}
