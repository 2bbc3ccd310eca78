//! Expense list entity.
//!
//! # Responsibility
//! - Define the `Expense` record persisted in the expenses slot.
//! - Parse locale-formatted amount text from the expense form.
//!
//! # Invariants
//! - `amount` is finite and strictly positive.
//! - `date` is assigned once at creation and never changed by edits.
//! - `date` is written as RFC 3339 UTC with millisecond precision.

use crate::model::entity::Entity;
use crate::model::id::EntityId;
use crate::model::validation::ValidationError;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Venue,
    Food,
    Dress,
    Photo,
    Music,
    Flowers,
    Invitation,
    Transport,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Venue,
        ExpenseCategory::Food,
        ExpenseCategory::Dress,
        ExpenseCategory::Photo,
        ExpenseCategory::Music,
        ExpenseCategory::Flowers,
        ExpenseCategory::Invitation,
        ExpenseCategory::Transport,
        ExpenseCategory::Other,
    ];

    /// Wire value stored in the `category` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Food => "food",
            Self::Dress => "dress",
            Self::Photo => "photo",
            Self::Music => "music",
            Self::Flowers => "flowers",
            Self::Invitation => "invitation",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }

    /// Label shown in the UI; also matched by free-text search.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Venue => "Mekan",
            Self::Food => "Yemek",
            Self::Dress => "Kıyafet",
            Self::Photo => "Fotoğraf",
            Self::Music => "Müzik",
            Self::Flowers => "Çiçek",
            Self::Invitation => "Davetiye",
            Self::Transport => "Ulaşım",
            Self::Other => "Diğer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
    }
}

/// One planned or paid expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: EntityId,
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub paid: bool,
}

impl Expense {
    /// Builds a new unpaid expense dated `created_at`.
    pub fn from_draft(
        id: EntityId,
        draft: &ExpenseDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let fields = draft.validate()?;
        Ok(Self {
            id,
            title: fields.title,
            amount: fields.amount,
            category: fields.category,
            date: truncate_to_millis(created_at),
            notes: fields.notes,
            paid: false,
        })
    }

    /// Replaces editable fields; `id`, `date` and `paid` are preserved.
    pub fn apply_draft(&mut self, draft: &ExpenseDraft) -> Result<(), ValidationError> {
        let fields = draft.validate()?;
        self.title = fields.title;
        self.amount = fields.amount;
        self.category = fields.category;
        self.notes = fields.notes;
        Ok(())
    }

    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            title: self.title.clone(),
            amount: self.amount.to_string(),
            category: self.category,
            notes: self.notes.clone(),
        }
    }
}

impl Entity for Expense {
    const KIND: &'static str = "expense";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_blank() {
            return Err(ValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::AmountOutOfRange(self.amount));
        }
        Ok(())
    }
}

/// Raw add/edit form input for an expense. `amount` is the typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: String,
    pub category: ExpenseCategory,
    pub notes: String,
}

struct ValidExpenseFields {
    title: String,
    amount: f64,
    category: ExpenseCategory,
    notes: String,
}

impl ExpenseDraft {
    pub fn new(title: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount: amount.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    fn validate(&self) -> Result<ValidExpenseFields, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let amount = parse_amount(&self.amount)?;
        Ok(ValidExpenseFields {
            title: title.to_string(),
            amount,
            category: self.category,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Parses amount text typed with either decimal separator.
///
/// When the text contains a comma, dots are thousands separators and the
/// comma is the decimal point (`1.500,50`). Otherwise the text is read as a
/// plain decimal (`1500.50`).
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let compact = input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect::<String>();
    if compact.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    let normalized = if compact.contains(',') {
        compact.replace('.', "").replace(',', ".")
    } else {
        compact
    };

    let invalid = || ValidationError::InvalidAmount {
        input: input.trim().to_string(),
    };
    let amount = normalized.parse::<f64>().map_err(|_| invalid())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid());
    }
    Ok(amount)
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    let millis_nanos = (value.nanosecond() / 1_000_000) * 1_000_000;
    value.with_nanosecond(millis_nanos).unwrap_or(value)
}

/// Serde adapter matching JavaScript `Date.toISOString()` output.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| serde::de::Error::custom(format!("invalid date `{raw}`: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, Expense, ExpenseCategory, ExpenseDraft};
    use crate::model::entity::Entity;
    use crate::model::id::EntityId;
    use crate::model::validation::ValidationError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_amount_accepts_both_decimal_styles() {
        assert_eq!(parse_amount("1.500,50").unwrap(), 1500.50);
        assert_eq!(parse_amount("12,5").unwrap(), 12.5);
        assert_eq!(parse_amount("1500.50").unwrap(), 1500.50);
        assert_eq!(parse_amount(" 2 000 ").unwrap(), 2000.0);
    }

    #[test]
    fn parse_amount_rejects_non_positive_and_garbage() {
        assert_eq!(parse_amount("  "), Err(ValidationError::EmptyAmount));
        for input in ["0", "-5", "abc", "1,2,3", "inf", "NaN"] {
            assert!(
                matches!(parse_amount(input), Err(ValidationError::InvalidAmount { .. })),
                "`{input}` should be rejected"
            );
        }
    }

    #[test]
    fn edit_preserves_date_and_paid_flag() {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let mut expense = Expense::from_draft(
            EntityId::new("e1"),
            &ExpenseDraft::new("Salon", "20000"),
            created_at,
        )
        .unwrap();
        expense.paid = true;

        expense
            .apply_draft(&ExpenseDraft::new("Salon kapora", "5.000,00").with_category(ExpenseCategory::Venue))
            .unwrap();

        assert_eq!(expense.title, "Salon kapora");
        assert_eq!(expense.amount, 5000.0);
        assert_eq!(expense.category, ExpenseCategory::Venue);
        assert_eq!(expense.date, created_at);
        assert!(expense.paid);
    }

    #[test]
    fn date_serializes_like_javascript_iso_strings() {
        let created_at = Utc.timestamp_millis_opt(1_735_689_600_123).unwrap();
        let expense = Expense::from_draft(
            EntityId::new("e1"),
            &ExpenseDraft::new("Davetiye baskı", "750"),
            created_at,
        )
        .unwrap();

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["date"], "2025-01-01T00:00:00.123Z");
        assert_eq!(json["category"], "other");
        assert_eq!(json["paid"], false);
    }

    #[test]
    fn stored_non_positive_amount_fails_validation() {
        let expense: Expense = serde_json::from_value(serde_json::json!({
            "id": "e9",
            "title": "Bozuk kayıt",
            "amount": -10.0,
            "category": "food",
            "date": "2025-01-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(expense.validate(), Err(ValidationError::AmountOutOfRange(-10.0)));
    }

    #[test]
    fn category_lookup_round_trips_wire_ids() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ExpenseCategory::parse("catering"), None);
    }
}
