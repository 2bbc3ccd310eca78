//! Expense list use-case service.
//!
//! # Responsibility
//! - Create, edit, delete and mark expenses paid through the repository.
//! - Drive bulk selection and bulk delete.
//!
//! # Invariants
//! - `date` is stamped once at creation; edits keep it.
//! - Every mutation round-trips the full expenses slot.

use crate::config::PlannerConfig;
use crate::model::expense::{Expense, ExpenseDraft};
use crate::model::id::EntityId;
use crate::repo::collection_repo::{CollectionRepository, LoadReport, LoadState};
use crate::selection::BulkSelection;
use crate::service::{delete_selected, ServiceError, ServiceResult, TapOutcome};
use crate::store::KeyValueStore;
use crate::view::expenses::{expense_totals, filter_expenses, ExpenseQuery, ExpenseTotals};
use chrono::{DateTime, Utc};
use log::info;

/// Expense list service over one expenses slot.
pub struct ExpenseService<S: KeyValueStore> {
    repo: CollectionRepository<Expense, S>,
    selection: BulkSelection,
}

impl<S: KeyValueStore> ExpenseService<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            repo: CollectionRepository::new(store, key),
            selection: BulkSelection::new(),
        }
    }

    pub fn from_config(store: S, config: &PlannerConfig) -> Self {
        Self::new(store, config.expenses_key.clone())
    }

    pub fn load(&mut self) -> ServiceResult<LoadReport> {
        Ok(self.repo.load()?)
    }

    pub fn load_state(&self) -> LoadState {
        self.repo.state()
    }

    /// Expenses in stored (insertion) order.
    pub fn expenses(&self) -> &[Expense] {
        self.repo.items()
    }

    pub fn expense(&self, id: &EntityId) -> Option<&Expense> {
        self.repo.get(id)
    }

    /// Filtered expenses, newest first.
    pub fn visible(&self, query: &ExpenseQuery) -> Vec<&Expense> {
        filter_expenses(self.repo.items(), query)
    }

    pub fn totals(&self) -> ExpenseTotals {
        expense_totals(self.repo.items())
    }

    /// Validates `draft`, appends a new unpaid expense dated now and persists.
    pub fn create(&mut self, draft: &ExpenseDraft) -> ServiceResult<Expense> {
        self.create_at(draft, Utc::now())
    }

    /// Same as [`ExpenseService::create`] with an explicit creation time.
    pub fn create_at(
        &mut self,
        draft: &ExpenseDraft,
        created_at: DateTime<Utc>,
    ) -> ServiceResult<Expense> {
        let expense = Expense::from_draft(EntityId::generate(), draft, created_at)?;
        self.repo.mutate(|expenses| {
            expenses.push(expense.clone());
            Ok::<_, ServiceError>(())
        })?;
        info!(
            "event=expense_create module=service status=ok id={} category={}",
            expense.id,
            expense.category.as_str()
        );
        Ok(expense)
    }

    pub fn update(&mut self, id: &EntityId, draft: &ExpenseDraft) -> ServiceResult<Expense> {
        let updated = self.repo.update_one(id, |expense: &mut Expense| {
            expense.apply_draft(draft)?;
            Ok::<_, ServiceError>(expense.clone())
        })?;
        info!("event=expense_update module=service status=ok id={id}");
        Ok(updated)
    }

    pub fn edit_draft(&self, id: &EntityId) -> ServiceResult<ExpenseDraft> {
        self.repo
            .get(id)
            .map(Expense::to_draft)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    pub fn delete(&mut self, id: &EntityId) -> ServiceResult<()> {
        self.repo.remove_one(id)?;
        info!("event=expense_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Flips `paid` and persists. Returns the new value.
    pub fn toggle_paid(&mut self, id: &EntityId) -> ServiceResult<bool> {
        let paid = self.repo.update_one(id, |expense: &mut Expense| {
            expense.paid = !expense.paid;
            Ok::<_, ServiceError>(expense.paid)
        })?;
        info!("event=expense_toggle_paid module=service status=ok id={id} paid={paid}");
        Ok(paid)
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

    /// Row tap: toggles selection in bulk mode, `paid` otherwise.
    pub fn tap(&mut self, id: &EntityId) -> ServiceResult<TapOutcome> {
        if self.selection.is_active() {
            let selected = self.selection.toggle(id.clone());
            return Ok(TapOutcome::SelectionToggled { selected });
        }
        let value = self.toggle_paid(id)?;
        Ok(TapOutcome::FlagToggled { value })
    }

    pub fn long_press(&mut self, id: &EntityId) -> bool {
        if self.selection.is_active() {
            return false;
        }
        self.selection.enter(Some(id.clone()));
        true
    }

    pub fn bulk_delete(&mut self) -> ServiceResult<usize> {
        delete_selected(&mut self.repo, &mut self.selection)
    }
}
