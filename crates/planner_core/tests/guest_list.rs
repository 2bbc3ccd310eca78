mod common;

use common::{FakeAddressBook, RecordingDispatcher};
use planner_core::db::open_db;
use planner_core::{
    DeviceContact, EntityId, ErrorKind, GuestListService, KeyValueStore, LoadState,
    MemoryKvStore, PeopleFilter, PersonDraft, PlannerConfig, ServiceError, Side, SmsLinkStyle,
    SqliteKvStore, TapOutcome, ValidationError,
};

const PEOPLE_KEY: &str = "wedding_people";

fn loaded_service(store: &MemoryKvStore) -> GuestListService<MemoryKvStore> {
    let mut service = GuestListService::new(store.clone(), PEOPLE_KEY);
    service.load().unwrap();
    service
}

#[test]
fn created_guest_survives_reopening_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.sqlite3");

    let created = {
        let conn = open_db(&path).unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        let mut service = GuestListService::new(store, PEOPLE_KEY);
        service.load().unwrap();
        let draft = PersonDraft::new("  Ayşe Yılmaz ")
            .with_phone("0555 111 22 33")
            .with_side(Side::Bride)
            .with_notes("kuzen");
        service.create(&draft).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let mut service = GuestListService::new(store, PEOPLE_KEY);
    service.load().unwrap();

    assert_eq!(service.people().len(), 1);
    let loaded = &service.people()[0];
    assert_eq!(loaded, &created);
    assert_eq!(loaded.name, "Ayşe Yılmaz");
    assert!(!loaded.invited);
    assert_eq!(loaded.side, Side::Bride);
}

#[test]
fn toggle_invited_twice_restores_flag_and_persists_each_step() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let person = service.create(&PersonDraft::new("Ali")).unwrap();

    assert!(service.toggle_invited(&person.id).unwrap());
    let raw = store.get(PEOPLE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"invited\":true"));

    assert!(!service.toggle_invited(&person.id).unwrap());
    let raw = store.get(PEOPLE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"invited\":false"));
    assert_eq!(service.stats().invited, 0);
}

#[test]
fn create_rejects_blank_name_without_writing() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);

    let err = service.create(&PersonDraft::new("   ")).unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ValidationError::EmptyName)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(store.get(PEOPLE_KEY).unwrap(), None);
}

#[test]
fn update_keeps_id_and_invited_flag() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let person = service.create(&PersonDraft::new("Ali")).unwrap();
    service.toggle_invited(&person.id).unwrap();

    let mut draft = service.edit_draft(&person.id).unwrap();
    assert_eq!(draft.name, "Ali");
    draft.name = "Ali Veli".to_string();
    draft.side = Side::Groom;
    let updated = service.update(&person.id, &draft).unwrap();

    assert_eq!(updated.id, person.id);
    assert!(updated.invited);
    assert_eq!(updated.side, Side::Groom);
    assert_eq!(service.people().len(), 1);
}

#[test]
fn mutations_on_unknown_id_report_not_found() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    service.create(&PersonDraft::new("Ali")).unwrap();
    let ghost = EntityId::new("ghost");

    assert!(matches!(
        service.toggle_invited(&ghost).unwrap_err(),
        ServiceError::NotFound(id) if id == ghost
    ));
    assert!(matches!(
        service.delete(&ghost).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        service.update(&ghost, &PersonDraft::new("X")).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert_eq!(service.people().len(), 1);
}

#[test]
fn mutations_before_load_are_rejected() {
    let store = MemoryKvStore::new();
    let mut service = GuestListService::new(store.clone(), PEOPLE_KEY);
    assert_eq!(service.load_state(), LoadState::Unloaded);

    let err = service.create(&PersonDraft::new("Ali")).unwrap_err();
    assert!(matches!(err, ServiceError::NotLoaded));
    assert!(!err.is_user_facing());
    assert_eq!(store.get(PEOPLE_KEY).unwrap(), None);
}

#[test]
fn failed_write_leaves_list_unchanged() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let person = service.create(&PersonDraft::new("Ali")).unwrap();

    store.set_fail_writes(true);
    let err = service.create(&PersonDraft::new("Berk")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(matches!(service.toggle_invited(&person.id), Err(ServiceError::Persistence(_))));

    assert_eq!(service.people().len(), 1);
    assert!(!service.people()[0].invited);
}

#[test]
fn bulk_delete_removes_exactly_the_selection() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service.create(&PersonDraft::new("Ali")).unwrap();
    let berk = service.create(&PersonDraft::new("Berk")).unwrap();
    let cem = service.create(&PersonDraft::new("Cem")).unwrap();

    assert!(service.long_press(&ali.id));
    assert_eq!(
        service.tap(&cem.id).unwrap(),
        TapOutcome::SelectionToggled { selected: true }
    );
    assert_eq!(service.selection().len(), 2);

    assert_eq!(service.bulk_delete().unwrap(), 2);
    assert!(!service.selection().is_active());
    let remaining = service.people().iter().map(|p| &p.id).collect::<Vec<_>>();
    assert_eq!(remaining, vec![&berk.id]);

    let reloaded = loaded_service(&store);
    assert_eq!(reloaded.people().len(), 1);
}

#[test]
fn bulk_delete_with_empty_selection_warns_and_keeps_list() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    service.create(&PersonDraft::new("Ali")).unwrap();
    service.enter_selection(None);

    let err = service.bulk_delete().unwrap_err();
    assert!(matches!(err, ServiceError::EmptySelection));
    assert!(err.is_user_facing());
    assert_eq!(service.people().len(), 1);
    assert!(service.selection().is_active());
}

#[test]
fn tap_toggles_invited_outside_bulk_mode() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service.create(&PersonDraft::new("Ali")).unwrap();

    assert_eq!(
        service.tap(&ali.id).unwrap(),
        TapOutcome::FlagToggled { value: true }
    );
    assert!(service.long_press(&ali.id));
    assert!(!service.long_press(&ali.id));
    assert_eq!(
        service.tap(&ali.id).unwrap(),
        TapOutcome::SelectionToggled { selected: false }
    );
    assert!(service.people()[0].invited);
}

#[test]
fn visible_combines_filter_and_search() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_side(Side::Bride))
        .unwrap();
    service
        .create(&PersonDraft::new("Berk").with_side(Side::Groom).with_notes("ali'nin arkadaşı"))
        .unwrap();
    service.toggle_invited(&ali.id).unwrap();

    assert_eq!(service.visible(PeopleFilter::All, "ali").len(), 2);
    assert_eq!(service.visible(PeopleFilter::Invited, "ali").len(), 1);
    assert_eq!(service.visible(PeopleFilter::GroomSide, "").len(), 1);
    assert!(service.visible(PeopleFilter::Shared, "").is_empty());
}

#[test]
fn importing_contacts_adds_shared_uninvited_guests() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let mut book = FakeAddressBook::granted(vec![
        DeviceContact::new("c1", "A"),
        DeviceContact::new("c2", "B"),
        DeviceContact::new("c3", "  "),
    ]);

    let contacts = service.read_device_contacts(&mut book).unwrap();
    assert_eq!(contacts.len(), 2);

    let imported = service.import_contacts(&contacts).unwrap();
    assert_eq!(imported.len(), 2);
    for person in service.people() {
        assert_eq!(person.phone, "");
        assert_eq!(person.side, Side::Shared);
        assert!(!person.invited);
    }
    let names = service.people().iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn importing_nothing_is_rejected() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    assert!(matches!(
        service.import_contacts(&[]).unwrap_err(),
        ServiceError::EmptySelection
    ));
    assert_eq!(store.get(PEOPLE_KEY).unwrap(), None);
}

#[test]
fn denied_contacts_permission_is_reported() {
    let store = MemoryKvStore::new();
    let service = loaded_service(&store);
    let mut book = FakeAddressBook::denied();

    let err = service.read_device_contacts(&mut book).unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied));
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
}

#[test]
fn contacts_read_failure_is_a_capability_error() {
    let store = MemoryKvStore::new();
    let service = loaded_service(&store);
    let mut book = FakeAddressBook::granted(Vec::new());
    book.fetch_error = Some("address book locked".to_string());

    let err = service.read_device_contacts(&mut book).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapabilityUnavailable);
}

#[test]
fn bulk_sms_skips_people_without_phone() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("0555 111 22 33"))
        .unwrap();
    let berk = service.create(&PersonDraft::new("Berk")).unwrap();
    let cem = service
        .create(&PersonDraft::new("Cem").with_phone("+90 555 444 55 66"))
        .unwrap();

    service.enter_selection(Some(ali.id.clone()));
    service.toggle_selection(berk.id.clone());
    service.toggle_selection(cem.id.clone());

    let plan = service.prepare_bulk_sms("Düğüne davetlisiniz!").unwrap();
    assert_eq!(plan.skipped, 1);
    assert_eq!(plan.recipients.len(), 2);
    assert!(plan.needs_confirmation());
    let warning = plan.warning().unwrap();
    assert!(warning.contains('1'));
    assert!(warning.contains('2'));

    let mut dispatcher = RecordingDispatcher::default();
    assert_eq!(service.send_bulk_sms(&plan, &mut dispatcher).unwrap(), 2);
    assert_eq!(
        dispatcher.opened,
        vec!["sms:05551112233;+905554445566?body=D%C3%BC%C4%9F%C3%BCne%20davetlisiniz!".to_string()]
    );
    assert!(!service.selection().is_active());
}

#[test]
fn bulk_sms_counts_undialable_phone_as_skipped() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("05551112233"))
        .unwrap();
    let berk = service
        .create(&PersonDraft::new("Berk").with_phone("yok"))
        .unwrap();
    service.enter_selection(Some(ali.id.clone()));
    service.toggle_selection(berk.id.clone());

    let plan = service.prepare_bulk_sms("selam").unwrap();
    assert_eq!(plan.skipped, 1);
    assert_eq!(plan.recipients.len(), 1);
    assert_eq!(plan.recipients[0].person_id, ali.id);
    assert_eq!(plan.recipients[0].number, "05551112233");
    assert!(plan.warning().is_some());

    let mut dispatcher = RecordingDispatcher::default();
    assert_eq!(service.send_bulk_sms(&plan, &mut dispatcher).unwrap(), 1);
    assert_eq!(dispatcher.opened, vec!["sms:05551112233?body=selam".to_string()]);
}

#[test]
fn bulk_sms_with_only_undialable_phones_has_no_recipients() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let berk = service
        .create(&PersonDraft::new("Berk").with_phone("-"))
        .unwrap();
    service.enter_selection(Some(berk.id.clone()));

    assert!(matches!(
        service.prepare_bulk_sms("selam").unwrap_err(),
        ServiceError::NoRecipients
    ));
}

#[test]
fn bulk_sms_follows_configured_link_style() {
    let store = MemoryKvStore::new();
    let config = PlannerConfig {
        sms_link_style: SmsLinkStyle::Ampersand,
        ..PlannerConfig::default()
    };
    let mut service = GuestListService::from_config(store, &config);
    service.load().unwrap();
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("0555 111 22 33"))
        .unwrap();
    let cem = service
        .create(&PersonDraft::new("Cem").with_phone("+90 555 444 55 66"))
        .unwrap();
    service.enter_selection(Some(ali.id.clone()));
    service.toggle_selection(cem.id.clone());

    let plan = service.prepare_bulk_sms("selam").unwrap();
    let mut dispatcher = RecordingDispatcher::default();
    assert_eq!(service.send_bulk_sms(&plan, &mut dispatcher).unwrap(), 2);
    assert_eq!(
        dispatcher.opened,
        vec!["sms:05551112233,+905554445566&body=selam".to_string()]
    );
}

#[test]
fn bulk_sms_input_checks() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let berk = service.create(&PersonDraft::new("Berk")).unwrap();

    assert!(matches!(
        service.prepare_bulk_sms("selam").unwrap_err(),
        ServiceError::EmptySelection
    ));
    service.enter_selection(Some(berk.id.clone()));
    assert!(matches!(
        service.prepare_bulk_sms("   ").unwrap_err(),
        ServiceError::EmptyMessage
    ));
    assert!(matches!(
        service.prepare_bulk_sms("selam").unwrap_err(),
        ServiceError::NoRecipients
    ));
}

#[test]
fn unsupported_sms_scheme_keeps_selection() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("05551112233"))
        .unwrap();
    service.enter_selection(Some(ali.id.clone()));
    let plan = service.prepare_bulk_sms("selam").unwrap();
    assert!(!plan.needs_confirmation());
    assert_eq!(plan.warning(), None);

    let mut dispatcher = RecordingDispatcher::unsupported();
    let err = service.send_bulk_sms(&plan, &mut dispatcher).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapabilityUnavailable);
    assert!(service.selection().is_active());
    assert!(dispatcher.opened.is_empty());
}

#[test]
fn whatsapp_opens_chat_with_country_code() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("555 123 45 67"))
        .unwrap();
    let berk = service.create(&PersonDraft::new("Berk")).unwrap();

    let mut dispatcher = RecordingDispatcher::default();
    service
        .send_whatsapp(&ali.id, "Merhaba", &mut dispatcher)
        .unwrap();
    assert_eq!(
        dispatcher.opened,
        vec!["whatsapp://send?phone=905551234567&text=Merhaba".to_string()]
    );

    assert!(matches!(
        service.send_whatsapp(&berk.id, "Merhaba", &mut dispatcher).unwrap_err(),
        ServiceError::MissingPhone(_)
    ));
}

#[test]
fn whatsapp_missing_app_is_reported_without_fallback() {
    let store = MemoryKvStore::new();
    let mut service = loaded_service(&store);
    let ali = service
        .create(&PersonDraft::new("Ali").with_phone("05551234567"))
        .unwrap();

    let mut dispatcher = RecordingDispatcher::unsupported();
    let err = service
        .send_whatsapp(&ali.id, "Merhaba", &mut dispatcher)
        .unwrap_err();
    match err {
        ServiceError::Messaging(inner) => assert_eq!(inner.detail, None),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dispatcher.opened.is_empty());
}
