//! Planner session: both lists mounted over one key-value store.
//!
//! # Responsibility
//! - Open storage from configuration.
//! - Build the guest and expense services and run their one-time load.
//!
//! # Invariants
//! - A failed load is logged and leaves that list `Unloaded`; it is never
//!   fatal and is not retried.

use crate::config::PlannerConfig;
use crate::db::{open_db, DbResult};
use crate::repo::collection_repo::LoadState;
use crate::service::expense_service::ExpenseService;
use crate::service::guest_service::GuestListService;
use crate::store::KeyValueStore;
use log::{info, warn};
use rusqlite::Connection;

/// Opens the configured SQLite database with storage bootstrapped.
pub fn open_storage(config: &PlannerConfig) -> DbResult<Connection> {
    open_db(&config.db_path)
}

/// Guest list and expense list sharing one store.
pub struct Planner<S: KeyValueStore + Clone> {
    guests: GuestListService<S>,
    expenses: ExpenseService<S>,
}

impl<S: KeyValueStore + Clone> Planner<S> {
    /// Builds both services and loads each list once.
    pub fn mount(store: S, config: &PlannerConfig) -> Self {
        let mut guests = GuestListService::from_config(store.clone(), config);
        let mut expenses = ExpenseService::from_config(store, config);

        if let Err(err) = guests.load() {
            warn!("event=planner_mount module=core status=degraded list=people error={err}");
        }
        if let Err(err) = expenses.load() {
            warn!("event=planner_mount module=core status=degraded list=expenses error={err}");
        }
        info!(
            "event=planner_mount module=core status=ok people={} expenses={}",
            guests.people().len(),
            expenses.expenses().len()
        );

        Self { guests, expenses }
    }

    pub fn guests(&self) -> &GuestListService<S> {
        &self.guests
    }

    pub fn guests_mut(&mut self) -> &mut GuestListService<S> {
        &mut self.guests
    }

    pub fn expenses(&self) -> &ExpenseService<S> {
        &self.expenses
    }

    pub fn expenses_mut(&mut self) -> &mut ExpenseService<S> {
        &mut self.expenses
    }

    pub fn is_ready(&self) -> bool {
        self.guests.load_state() == LoadState::Loaded
            && self.expenses.load_state() == LoadState::Loaded
    }
}
