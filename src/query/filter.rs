use uuid::Uuid;

use crate::domain::period::{in_period, ReportingPeriod};
use crate::domain::{EntryKind, Transaction};

/// Transactions dated within `period` (inclusive), in input order. `None` keeps everything.
pub fn filter_by_period<'a>(
    transactions: &'a [Transaction],
    period: Option<&ReportingPeriod>,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|txn| in_period(period, txn.date))
        .collect()
}

/// Conjunction of optional criteria; an empty filter matches every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub kind: Option<EntryKind>,
    pub period: Option<ReportingPeriod>,
    pub name_contains: Option<String>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn period(mut self, period: ReportingPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.name_contains = if needle.trim().is_empty() {
            None
        } else {
            Some(needle.trim().to_lowercase())
        };
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.account_id == id)
            && self.category_id.map_or(true, |id| txn.category_id == id)
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && in_period(self.period.as_ref(), txn.date)
            && self
                .name_contains
                .as_deref()
                .map_or(true, |needle| txn.name.to_lowercase().contains(needle))
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| self.matches(txn)).collect()
    }
}
