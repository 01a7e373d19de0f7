use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{EntryKind, Identifiable};
use crate::utils::dates::{shift_month, shift_year};

/// Cadence offered for recurring transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn next_date(&self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => from + Duration::days(1),
            Frequency::Weekly => from + Duration::weeks(1),
            Frequency::Monthly => shift_month(from, 1),
            Frequency::Yearly => shift_year(from, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }
}

/// Descriptive recurrence marker. It never materialises transactions on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Self { frequency }
    }

    /// First scheduled date strictly after `after`, for a schedule anchored at `anchor`.
    ///
    /// Month and year steps are computed from the anchor rather than chained, so a
    /// schedule anchored on the 31st lands on the 31st again whenever the month allows.
    pub fn next_occurrence(&self, anchor: NaiveDate, after: NaiveDate) -> NaiveDate {
        if after < anchor {
            return anchor;
        }
        match self.frequency {
            Frequency::Daily => after + Duration::days(1),
            Frequency::Weekly => {
                let elapsed = (after - anchor).num_days();
                let steps = elapsed.div_euclid(7) + 1;
                anchor + Duration::days(steps * 7)
            }
            Frequency::Monthly | Frequency::Yearly => {
                let step = if self.frequency == Frequency::Monthly { 1 } else { 12 };
                let mut n = 1;
                loop {
                    let candidate = shift_month(anchor, n * step);
                    if candidate > after {
                        return candidate;
                    }
                    n += 1;
                }
            }
        }
    }
}

/// A single ledger entry. `amount` is always a positive magnitude; direction comes from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Transaction {
    pub fn new(
        account_id: Uuid,
        category_id: Uuid,
        name: impl Into<String>,
        amount: Decimal,
        kind: EntryKind,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            category_id,
            name: name.into(),
            amount,
            kind,
            date,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// `+amount` for income, `-amount` for expense.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Input for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
    pub date: NaiveDate,
    pub recurrence: Option<Recurrence>,
}

impl TransactionDraft {
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            account_id: self.account_id,
            category_id: self.category_id,
            name: self.name.trim().to_string(),
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            recurrence: self.recurrence,
        }
    }
}

/// Partial update for a transaction. `recurrence: Some(None)` clears the marker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub kind: Option<EntryKind>,
    pub date: Option<NaiveDate>,
    pub recurrence: Option<Option<Recurrence>>,
}

impl TransactionPatch {
    pub fn apply_to(&self, transaction: &Transaction) -> Transaction {
        let mut merged = transaction.clone();
        if let Some(account_id) = self.account_id {
            merged.account_id = account_id;
        }
        if let Some(category_id) = self.category_id {
            merged.category_id = category_id;
        }
        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(amount) = self.amount {
            merged.amount = amount;
        }
        if let Some(kind) = self.kind {
            merged.kind = kind;
        }
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(recurrence) = self.recurrence {
            merged.recurrence = recurrence;
        }
        merged
    }
}
