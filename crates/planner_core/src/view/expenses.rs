//! Expense list view.

use super::{contains_needle, search_needle};
use crate::model::expense::{Expense, ExpenseCategory};
use serde::{Deserialize, Serialize};

/// Payment status chips shown above the expense list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl PaymentFilter {
    pub fn matches(self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Paid => expense.paid,
            Self::Unpaid => !expense.paid,
        }
    }
}

/// Full filter state of the expense screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    pub status: PaymentFilter,
    /// `None` shows every category.
    pub category: Option<ExpenseCategory>,
    pub text: String,
}

impl ExpenseQuery {
    pub fn status(status: PaymentFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn category(category: ExpenseCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Money totals over the whole expense list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpenseTotals {
    pub total: f64,
    pub paid: f64,
    pub unpaid: f64,
    pub count: usize,
}

/// Returns matching expenses, newest `date` first.
///
/// Search looks at title, notes and the category display name. Expenses with
/// equal dates keep their stored order.
pub fn filter_expenses<'a>(expenses: &'a [Expense], query: &ExpenseQuery) -> Vec<&'a Expense> {
    let needle = search_needle(&query.text);
    let mut visible = expenses
        .iter()
        .filter(|expense| query.status.matches(expense))
        .filter(|expense| query.category.map_or(true, |category| expense.category == category))
        .filter(|expense| match needle.as_deref() {
            None => true,
            Some(needle) => {
                contains_needle(&expense.title, needle)
                    || contains_needle(&expense.notes, needle)
                    || contains_needle(expense.category.display_name(), needle)
            }
        })
        .collect::<Vec<_>>();
    visible.sort_by(|left, right| right.date.cmp(&left.date));
    visible
}

pub fn expense_totals(expenses: &[Expense]) -> ExpenseTotals {
    expenses.iter().fold(
        ExpenseTotals {
            count: expenses.len(),
            ..ExpenseTotals::default()
        },
        |mut totals, expense| {
            totals.total += expense.amount;
            if expense.paid {
                totals.paid += expense.amount;
            } else {
                totals.unpaid += expense.amount;
            }
            totals
        },
    )
}
