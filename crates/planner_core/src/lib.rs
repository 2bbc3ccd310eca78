//! Core state for a personal event planner.
//! Owns the guest list and the expense list, their local persistence and
//! the derived views list screens render.

pub mod config;
pub mod contacts;
pub mod db;
pub mod format;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod planner;
pub mod repo;
pub mod selection;
pub mod service;
pub mod store;
pub mod view;

pub use config::{ConfigError, PlannerConfig};
pub use contacts::{ContactPhone, ContactsError, ContactsSource, DeviceContact, PermissionStatus};
pub use format::{format_currency, format_date, format_date_in};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use messaging::{Channel, DispatchError, MessagingError, SmsLinkStyle, UrlDispatcher};
pub use model::entity::Entity;
pub use model::expense::{parse_amount, Expense, ExpenseCategory, ExpenseDraft};
pub use model::id::EntityId;
pub use model::person::{Person, PersonDraft, Side};
pub use model::validation::ValidationError;
pub use planner::{open_storage, Planner};
pub use repo::collection_repo::{
    CollectionRepository, LoadReport, LoadState, QuarantinedRecord, RepoError, RepoResult,
};
pub use selection::BulkSelection;
pub use service::expense_service::ExpenseService;
pub use service::guest_service::{BulkSmsPlan, GuestListService, SmsRecipient};
pub use service::{ErrorKind, ServiceError, ServiceResult, TapOutcome};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};
pub use view::expenses::{ExpenseQuery, ExpenseTotals, PaymentFilter};
pub use view::people::{PeopleFilter, PeopleStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
